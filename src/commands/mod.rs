pub mod browse;
pub mod configure;
pub mod list;
pub mod show;

use crate::core::traits::TopicRepository;
use crate::utils::{FlowResult, handle_flow};
use crate::view::{MountOutcome, TopicView};

/// Mount the view, giving up on the fetch if Ctrl+C arrives first.
///
/// Returns false when the fetch was interrupted.
pub(crate) async fn mount_interruptible<R: TopicRepository>(view: &mut TopicView<R>) -> bool {
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // No signal handler means no interruption
            std::future::pending::<()>().await;
        }
    };

    if view.mount_until(interrupted).await == MountOutcome::Cancelled {
        handle_flow(FlowResult::Cancelled("Fetch interrupted".to_string()));
        return false;
    }
    true
}
