// Badge token format printed into attendee QR codes.

pub const TAG: &str = "ATT";
pub const FIELD_COUNT: usize = 5;
pub const SEPARATOR: char = '|';

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("expected {FIELD_COUNT} fields, got {0}")]
    FieldCount(usize),
    #[error("unknown tag {0:?}")]
    UnknownTag(String),
    #[error("expiry is not an integer: {0:?}")]
    InvalidExpiry(String),
    #[error("field contains separator: {0:?}")]
    EmbeddedSeparator(String),
}

/// Attendee reference carried in a badge: a numeric identifier or an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendeeRef {
    Id(u64),
    Email(String),
}

impl AttendeeRef {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<u64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Email(raw.to_string()),
        }
    }

    // Emails compare case-insensitively; ids must match exactly.
    pub fn matches(&self, id: u64, email: &str) -> bool {
        match self {
            Self::Id(expected) => *expected == id,
            Self::Email(expected) => expected.eq_ignore_ascii_case(email),
        }
    }
}

impl std::fmt::Display for AttendeeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Email(email) => f.write_str(email),
        }
    }
}

/// Badge payload scanned off an attendee QR code.
///
/// The expiry and signature ride along unverified; validating them is the
/// backend's concern on submit.
///
/// ```
/// use lanyard_qr::{AttendeeRef, BadgePayload};
///
/// let badge = BadgePayload::decode("ATT|42|7|9999999999|abc").expect("decode");
/// assert_eq!(badge.attendee_ref, AttendeeRef::Id(42));
/// assert_eq!(badge.event_ref, "7");
/// assert_eq!(badge.encode(), "ATT|42|7|9999999999|abc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgePayload {
    pub attendee_ref: AttendeeRef,
    pub event_ref: String,
    pub expiry: i64,
    pub signature: String,
}

impl BadgePayload {
    pub fn new(
        attendee_ref: AttendeeRef,
        event_ref: String,
        expiry: i64,
        signature: String,
    ) -> Result<Self> {
        // A field holding the separator would shift every later field on decode.
        if let AttendeeRef::Email(email) = &attendee_ref
            && email.contains(SEPARATOR)
        {
            return Err(Error::EmbeddedSeparator(email.clone()));
        }
        if event_ref.contains(SEPARATOR) {
            return Err(Error::EmbeddedSeparator(event_ref));
        }
        if signature.contains(SEPARATOR) {
            return Err(Error::EmbeddedSeparator(signature));
        }
        Ok(Self {
            attendee_ref,
            event_ref,
            expiry,
            signature,
        })
    }

    pub fn decode(input: &str) -> Result<Self> {
        let fields: Vec<&str> = input.split(SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(Error::FieldCount(fields.len()));
        }
        if fields[0] != TAG {
            return Err(Error::UnknownTag(fields[0].to_string()));
        }
        let expiry = fields[3]
            .parse::<i64>()
            .map_err(|_| Error::InvalidExpiry(fields[3].to_string()))?;
        Ok(Self {
            attendee_ref: AttendeeRef::parse(fields[1]),
            event_ref: fields[2].to_string(),
            expiry,
            signature: fields[4].to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{TAG}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.attendee_ref, self.event_ref, self.expiry, self.signature
        )
    }

    // Event reference as a numeric id when the badge carries one.
    pub fn event_id(&self) -> Option<u64> {
        self.event_ref.parse::<u64>().ok()
    }
}
