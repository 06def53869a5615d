mod backend;
mod input;
mod render;
mod runtime;
mod ui;

use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use feed_core::{CoreConfig, FeedRuntime, PresenceRuntime, Reconciler};

use crate::backend::LocalBackend;
use crate::runtime::run_app;
use crate::ui::App;

#[derive(Parser)]
#[command(name = "feed-tui", about = "Live public feed viewer")]
struct Args {
    /// Seconds between simulated new items.
    #[arg(long, default_value_t = 5)]
    interval: u64,

    /// Number of pre-existing items in the demo backend.
    #[arg(long, default_value_t = 25)]
    history: usize,

    /// Start with an empty window instead of seeding from the newest item.
    #[arg(long)]
    empty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Restore the terminal before printing a panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ui::restore_terminal();
        original_hook(panic_info);
    }));

    feed_core::tracing_setup::init_tracing();
    let args = Args::parse();
    let config = CoreConfig::default();

    let backend = LocalBackend::new(args.history);
    let producer = backend.spawn_producer(Duration::from_secs(args.interval.max(1)));

    let seed = if args.empty { None } else { backend.newest() };
    let reconciler = Rc::new(Reconciler::new(
        Arc::new(backend.clone()),
        seed,
        &config,
    ));
    reconciler.init().await;

    let feed = FeedRuntime::new(reconciler, backend.subscribe_head());
    let presence = PresenceRuntime::start(Arc::new(backend), config.heartbeat_interval);
    let mut app = App::new(feed, presence);

    let mut terminal = ui::init_terminal()?;
    let result = run_app(&mut terminal, &mut app).await;

    // Tear down subscriptions and timers before leaving the screen.
    app.feed.shutdown();
    app.presence.shutdown();
    producer.abort();
    ui::restore_terminal()?;

    result
}
