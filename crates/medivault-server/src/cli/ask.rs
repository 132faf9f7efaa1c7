// crates/medivault-server/src/cli/ask.rs
// One-shot question through the full dispatch pipeline

use anyhow::Result;
use medivault::config::{EnvConfig, MediVaultConfig};
use medivault::dispatch::{
    DispatchOutcome, DispatchTimings, MockBackend, ProxyClient, QueryBackend, SearchStatus,
};
use medivault::http::create_shared_client;
use medivault::proxy::ProxyService;
use medivault::session::{Session, SessionOptions};
use medivault::state::{SettingsStore, StaticPermission};
use medivault_types::{EncryptionStatus, Role};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AskArgs {
    pub query: String,
    pub role: Role,
    pub proxy: Option<String>,
    pub offline: bool,
    pub audit_csv: Option<PathBuf>,
}

fn backend_for(args: &AskArgs) -> Arc<dyn QueryBackend> {
    if args.offline {
        return Arc::new(MockBackend);
    }
    if let Some(url) = &args.proxy {
        return Arc::new(ProxyClient::new(create_shared_client(), url));
    }
    Arc::new(ProxyService::from_config(
        &EnvConfig::load(),
        &MediVaultConfig::load(),
        create_shared_client(),
    ))
}

pub async fn run(args: AskArgs) -> Result<()> {
    let session = Session::new(SessionOptions {
        backend: backend_for(&args),
        settings_path: SettingsStore::default_path(),
        notifications: Arc::new(StaticPermission(true)),
        timings: DispatchTimings::default(),
    });

    let user = session.auth.login_as(args.role).await;
    session.chat.new_conversation().await;
    eprintln!("Signed in as {} ({})", user.name, user.role);

    let mut phases = session.dispatcher.subscribe();
    let printer = tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            let phase = *phases.borrow_and_update();
            if phase != EncryptionStatus::Idle {
                eprintln!("  [{}]", phase);
            }
        }
    });

    let outcome = session.dispatcher.submit(&args.query).await;
    printer.abort();

    match outcome? {
        DispatchOutcome::Ignored => eprintln!("Nothing to ask."),
        DispatchOutcome::Answered {
            answer,
            metric,
            search,
            records,
            ..
        } => {
            println!("{}", answer.content);
            eprintln!();
            eprintln!(
                "{} records from {} | latency {} ms | overhead {}% | accuracy {}%",
                records,
                search_label(search),
                metric.query_latency_ms,
                metric.encryption_overhead,
                metric.accuracy
            );
        }
        DispatchOutcome::Failed { message, error, .. } => {
            println!("{}", message.content);
            eprintln!();
            eprintln!("Generation failed: {}", error);
        }
    }

    let audit = session.audit.clone();
    session.shutdown().await;

    if let Some(path) = args.audit_csv {
        std::fs::write(&path, audit.to_csv())?;
        eprintln!("Audit log written to {}", path.display());
    }
    Ok(())
}

fn search_label(status: SearchStatus) -> &'static str {
    match status {
        SearchStatus::Encrypted => "encrypted index",
        SearchStatus::Demo => "demo records",
        SearchStatus::Unavailable => "nowhere (search unavailable)",
    }
}
