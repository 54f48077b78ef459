use clap::Parser;
use follow_stats::cluster::service::ClusterStateService;
use follow_stats::cluster::types::{Node, NodeId};
use follow_stats::config::NodeArgs;
use follow_stats::follow::registry::LocalFollowTasks;
use follow_stats::stats::coordinator::StatsCoordinator;
use follow_stats::stats::service::FollowStatsService;
use follow_stats::stats::transport::HttpNodeTransport;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = NodeArgs::parse();
    let stats_config = args.stats_config()?;

    let local_node = Node {
        id: args.node_id.clone().map(NodeId).unwrap_or_default(),
        http_addr: args.bind,
    };
    tracing::info!("Starting node {} on {}", local_node.id, local_node.http_addr);
    tracing::info!(
        "Status query timeout {:?}, {} connect attempts",
        stats_config.query_timeout,
        stats_config.connect_attempts
    );

    // 1. Cluster state (published from outside):
    let cluster = ClusterStateService::new(local_node.clone());

    // 2. Follow tasks running on this node:
    let local_tasks = LocalFollowTasks::new(local_node.id.clone());

    // 3. Stats service:
    let transport = HttpNodeTransport::new(stats_config.connect_attempts).with_local(local_tasks.clone());
    let coordinator = StatsCoordinator::new(Arc::new(transport), stats_config);
    let stats = FollowStatsService::new(cluster.clone(), coordinator);

    // 4. Spawn stats reporter:
    let reporter_cluster = cluster.clone();
    let reporter_tasks = local_tasks.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(30));

        loop {
            interval.tick().await;
            let state = reporter_cluster.state();
            tracing::info!(
                "Cluster state v{}: {} nodes, {} local follow tasks",
                state.version,
                state.nodes.len(),
                reporter_tasks.task_count()
            );
        }
    });

    // 5. Start HTTP server:
    let app = follow_stats::router(cluster, local_tasks, stats);

    tracing::info!("HTTP server listening on {}", args.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
