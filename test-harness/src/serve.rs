// Serves a seeded fake events backend for poking the back-office by hand.
use anyhow::{Context, Result, bail};
use clap::Parser;
use lanyard_api::{Activity, Attendee, Event, Question, QuestionKind, SurveyTree};
use lanyard_test_harness::{EventsBackend, PageStyle};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "events-backend")]
#[command(about = "Serve an in-memory fake of the events platform")]
struct Args {
    /// Listen address (host:port)
    #[arg(long, default_value = "127.0.0.1:8700")]
    listen: String,

    /// Bearer token every request must present
    #[arg(long, default_value = "local-token")]
    token: String,

    /// Pagination envelope: full, count-only, next-only, or bare
    #[arg(long, default_value = "full")]
    page_style: String,
}

fn parse_page_style(raw: &str) -> Result<PageStyle> {
    Ok(match raw {
        "full" => PageStyle::Full,
        "count-only" => PageStyle::CountOnly,
        "next-only" => PageStyle::NextOnly,
        "bare" => PageStyle::Bare,
        other => bail!("unknown page style {other:?}"),
    })
}

async fn seed_demo(backend: &EventsBackend) {
    backend
        .seed_event(Event {
            id: 1,
            name: "Lanyard Demo Expo".into(),
        })
        .await;
    for (id, name) in [(10, "Main hall check-in"), (11, "Workshop A")] {
        backend
            .seed_activity(Activity {
                id,
                event: 1,
                name: name.into(),
            })
            .await;
    }
    for (id, name, email) in [
        (101, "Zoe Rivera", "zoe@expo.mx"),
        (102, "Leo Santos", "leo@expo.mx"),
        (103, "Ana Ortiz", "ana@expo.mx"),
        (104, "Sam Fuentes", "sam@expo.mx"),
    ] {
        backend
            .seed_attendee(Attendee {
                id,
                name: name.into(),
                company: None,
                email: email.into(),
                event: 1,
                start_date: None,
            })
            .await;
    }
    backend
        .seed_survey(SurveyTree {
            id: 5,
            name: "Post-event survey".into(),
            description: Some("How did we do?".into()),
            questions: vec![Question {
                id: 51,
                text: "Would you come back?".into(),
                qtype: QuestionKind::YesNo,
                order: 1,
                required: true,
                options: Vec::new(),
            }],
        })
        .await;
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let style = parse_page_style(&args.page_style)?;

    let backend = EventsBackend::new(&args.token);
    backend.set_page_style(style).await;
    seed_demo(&backend).await;

    let listener = TcpListener::bind(&args.listen)
        .await
        .with_context(|| format!("bind {}", args.listen))?;
    let addr = listener.local_addr().context("read listen addr")?;
    info!(%addr, token = %args.token, "events backend listening");

    axum::serve(listener, backend.router().into_make_service())
        .await
        .context("serve events backend")?;
    Ok(())
}
