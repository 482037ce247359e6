use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use journal_editor::config::Flags;
use journal_editor::model::Node;
use journal_editor::session::{ScriptReport, Session};
use journal_editor::stats::DocumentStats;
use journal_editor::toolbar::ToolbarState;
use log::*;
use serde::Serialize;
use structopt::StructOpt;
use tokio::fs::read_to_string;
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Serialize)]
struct Summary<'a> {
    document: &'a [Node],
    selection: Option<String>,
    toolbar: ToolbarState,
    stats: DocumentStats,
    script: Option<ScriptReport>,
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var(env_logger::DEFAULT_FILTER_ENV).is_err() {
        std::env::set_var(
            env_logger::DEFAULT_FILTER_ENV,
            #[cfg(debug_assertions)]
            "warn,journal_editor=trace",
            #[cfg(not(debug_assertions))]
            "warn,journal_editor=info",
        );
    }
    env_logger::init();

    let subscriber = tracing_subscriber::registry().with(ErrorLayer::default());
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("Could not install the tracing subscriber")?;
    color_eyre::install()?;

    let flags = Flags::from_args();
    let setup = flags.load_cfg().await?;

    let mut session = match &setup.document {
        Some(path) => Session::open(path).await?,
        None => Session::default(),
    };
    if let Some(range) = setup.selection {
        session
            .editor_mut()
            .select(range)
            .wrap_err("Invalid selection in config")?;
    }

    let script = match &setup.script {
        Some(path) => {
            let text = read_to_string(path)
                .await
                .wrap_err("Could not read script")?;
            let report = session.apply_script(&text);
            info!("Script done: {:?}", report);
            Some(report)
        }
        None => None,
    };

    let editor = session.editor();
    let stats = DocumentStats::read(editor.children());
    if setup.report.json {
        let summary = Summary {
            document: editor.children(),
            selection: editor.selection().map(ToString::to_string),
            toolbar: ToolbarState::read(editor),
            stats,
            script,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    if setup.report.stats {
        println!("{}", stats);
    }

    match &setup.output {
        Some(path) => session.save(path).await?,
        None if !setup.report.json => println!("{}", editor.to_html()),
        None => {}
    }
    Ok(())
}
