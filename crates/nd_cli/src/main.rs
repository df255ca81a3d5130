use std::sync::Arc;

use clap::{Parser, ValueEnum};
use nd_client::{
    AuthProvider, GraphqlClient, GraphqlNewsApi, HttpAuthProvider, MemoryBackend, NewsApi,
};
use nd_core::{Error, MemorySession, NewsArticle, Result, SessionStore};
use nd_tui::{App, ClosePolicy, OsPlatform, Route};
use tracing::info;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Process-local demo backend with a seeded account.
    Memory,
    /// Remote GraphQL backend plus its identity provider.
    Graphql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClosePolicyArg {
    /// Close the preferences dialog as soon as it is submitted.
    Immediate,
    /// Keep it open until the save is confirmed.
    OnSuccess,
}

impl From<ClosePolicyArg> for ClosePolicy {
    fn from(arg: ClosePolicyArg) -> Self {
        match arg {
            ClosePolicyArg::Immediate => ClosePolicy::Immediate,
            ClosePolicyArg::OnSuccess => ClosePolicy::OnSuccess,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal client for AI-summarized, sentiment-scored news")]
struct Cli {
    #[arg(long, value_enum, default_value_t = BackendKind::Memory)]
    backend: BackendKind,

    /// GraphQL endpoint, e.g. https://backend.example.com/v1/graphql
    #[arg(long, required_if_eq("backend", "graphql"))]
    graphql_url: Option<String>,

    /// Identity provider base URL, e.g. https://backend.example.com/v1/auth/
    #[arg(long, required_if_eq("backend", "graphql"))]
    auth_url: Option<String>,

    #[arg(long, value_enum, default_value_t = ClosePolicyArg::Immediate)]
    close_policy: ClosePolicyArg,
}

const DEMO_EMAIL: &str = "demo@newsdigest.local";
const DEMO_PASSWORD: &str = "demo";

fn demo_articles() -> Vec<NewsArticle> {
    let items = [
        (
            "Fusion startup reports sustained net energy gain",
            "A private lab held a burning plasma for eight minutes, a first outside national facilities.",
            "VERY_POSITIVE",
            "Breakthrough framing with independent confirmation.",
            "https://news.example.com/fusion-gain",
        ),
        (
            "Regulators approve long-delayed rail corridor",
            "Construction on the cross-border line can begin after a decade of environmental review.",
            "POSITIVE",
            "Approval after delay reads as cautiously good news.",
            "https://news.example.com/rail-corridor",
        ),
        (
            "Chip inventories normalize as orders flatten",
            "Distributors report lead times back to 2019 levels while bookings stay flat.",
            "NEUTRAL",
            "Mixed supply and demand signals with no clear winner.",
            "https://news.example.com/chip-inventories",
        ),
        (
            "Drought forces second year of water rationing",
            "Reservoir levels remain below a third of capacity heading into summer.",
            "NEGATIVE",
            "Ongoing scarcity with no relief in the forecast.",
            "https://news.example.com/water-rationing",
        ),
        (
            "Data breach exposes records of 40 million customers",
            "Attackers held access for months before detection, and notification is still incomplete.",
            "VERY_NEGATIVE",
            "Large-scale harm compounded by slow disclosure.",
            "https://news.example.com/data-breach",
        ),
    ];

    items
        .into_iter()
        .enumerate()
        .map(|(n, (title, summary, label, explanation, url))| NewsArticle {
            id: format!("demo-{}", n),
            title: title.to_string(),
            summary: summary.to_string(),
            sentiment_label: label.to_string(),
            sentiment_explanation: explanation.to_string(),
            url: url.to_string(),
        })
        .collect()
}

fn parse_url(value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| Error::InvalidUrl(format!("{}: {}", value, e)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let session: Arc<dyn SessionStore> = Arc::new(MemorySession::new());

    let (auth, api): (Arc<dyn AuthProvider>, Arc<dyn NewsApi>) = match cli.backend {
        BackendKind::Memory => {
            let backend = Arc::new(MemoryBackend::new());
            let user_id = backend.seed_account(DEMO_EMAIL, DEMO_PASSWORD).await;
            for article in demo_articles() {
                backend.seed_article(&user_id, article).await;
            }
            info!(
                "🗞️ In-memory demo backend ready, sign in as {} / {}",
                DEMO_EMAIL, DEMO_PASSWORD
            );
            (backend.clone(), backend)
        }
        BackendKind::Graphql => {
            // Both flags are enforced by clap for this backend.
            let graphql_url = parse_url(cli.graphql_url.as_deref().unwrap_or_default())?;
            let auth_url = parse_url(cli.auth_url.as_deref().unwrap_or_default())?;
            info!("🗞️ Using GraphQL backend at {}", graphql_url);
            (
                Arc::new(HttpAuthProvider::new(auth_url)),
                Arc::new(GraphqlNewsApi::new(GraphqlClient::new(graphql_url))),
            )
        }
    };

    let mut app = App::new(
        session,
        auth,
        api,
        Box::new(OsPlatform::new()),
        cli.close_policy.into(),
    );
    // Land on the protected route; the gate sends us to sign-in.
    app.navigate(Route::Home);

    nd_tui::run(app).await
}
