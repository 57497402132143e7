use crate::core::traits::TopicRepository;
use crate::utils::error::AppError;
use crate::view::key::FormulaKey;
use crate::view::state::{Settled, ViewState};
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Settled(Settled),
    /// The cancel signal fired first; the view is still `Loading`
    Cancelled,
    AlreadyMounted,
}

/// A mounted topic tree: the injected repository plus the view state.
///
/// Exactly one fetch is issued per view. Toggles go straight to the
/// state and never reach the repository.
pub struct TopicView<R: TopicRepository> {
    repository: R,
    state: ViewState,
    mounted: bool,
    failure: Option<AppError>,
}

impl<R: TopicRepository> TopicView<R> {
    pub fn new(repository: R, state: ViewState) -> Self {
        Self {
            repository,
            state,
            mounted: false,
            failure: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Why the fetch failed, if it did. The view itself shows only `Empty`.
    pub fn failure(&self) -> Option<&AppError> {
        self.failure.as_ref()
    }

    pub async fn mount(&mut self) -> MountOutcome {
        self.mount_until(std::future::pending()).await
    }

    /// Fetch once, dropping the request if `cancel` resolves first
    pub async fn mount_until<C>(&mut self, cancel: C) -> MountOutcome
    where
        C: Future<Output = ()>,
    {
        if self.mounted {
            tracing::debug!("view already mounted; not fetching again");
            return MountOutcome::AlreadyMounted;
        }
        self.mounted = true;

        tracing::debug!(source = %self.repository.describe(), "fetching topics");
        let result = tokio::select! {
            result = self.repository.fetch_topics() => Some(result),
            _ = cancel => None,
        };

        let Some(result) = result else {
            tracing::info!("topic fetch cancelled");
            return MountOutcome::Cancelled;
        };

        if let Err(err) = &result {
            tracing::error!(
                source = %self.repository.describe(),
                error = %err,
                "failed to fetch topics"
            );
            self.failure = Some(err.clone());
        }

        let settled = self.state.settle(result);
        match settled {
            Settled::Populated(count) => tracing::info!(count, "topics loaded"),
            Settled::Empty => tracing::info!("no topics to show"),
            Settled::Ignored => tracing::warn!("fetch settled after the view left loading"),
        }
        MountOutcome::Settled(settled)
    }

    pub fn toggle_topic(&mut self, topic_id: &str) -> bool {
        let changed = self.state.toggle_topic(topic_id);
        if !changed {
            tracing::debug!(topic_id, "ignored toggle for unknown topic");
        }
        changed
    }

    pub fn toggle_formula(&mut self, key: &FormulaKey) -> bool {
        let changed = self.state.toggle_formula(key);
        if !changed {
            tracing::debug!(key = %key, "ignored toggle for unknown formula");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormulaPolicy;
    use crate::core::data::{Formula, Rule, Topic};
    use crate::store::StaticRepository;
    use crate::view::render::render;
    use crate::view::state::Phase;
    use crate::view::toolkit::TerminalToolkit;

    /// `[{t1, order 2, one rule with V+s}, {t2, order 1}]`
    fn scenario_topics() -> Vec<Topic> {
        let mut rule = Rule::new("Add -s");
        rule.formulas.push(Formula::new("V+s"));

        let mut t1 = Topic::new("t1", "Present Simple");
        t1.order = Some(2.0);
        t1.rules.push(rule);

        let mut t2 = Topic::new("t2", "Past Simple");
        t2.order = Some(1.0);

        vec![t1, t2]
    }

    fn view(repo: StaticRepository) -> TopicView<StaticRepository> {
        TopicView::new(repo, ViewState::new(FormulaPolicy::Single))
    }

    fn order(view: &TopicView<StaticRepository>) -> Vec<String> {
        view.state().topics().iter().map(|t| t.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_mount_sorts_by_order() {
        let mut view = view(StaticRepository::with_topics(scenario_topics()));
        assert_eq!(view.mount().await, MountOutcome::Settled(Settled::Populated(2)));
        assert_eq!(order(&view), vec!["t2", "t1"]);
    }

    #[tokio::test]
    async fn test_expand_and_collapse_scenario() {
        let mut view = view(StaticRepository::with_topics(scenario_topics()));
        view.mount().await;
        let kit = TerminalToolkit::plain();

        assert!(view.toggle_topic("t2"));
        assert_eq!(view.state().expanded_topic(), Some("t2"));
        assert!(!view.state().is_expanded("t1"));
        assert!(!render(view.state(), &kit).contains("V+s"));

        view.toggle_topic("t1");
        assert!(render(view.state(), &kit).contains("Add -s"));

        view.toggle_topic("t1");
        view.toggle_topic("t2");
        view.toggle_topic("t2");
        assert_eq!(view.state().expanded_topic(), None);
    }

    #[tokio::test]
    async fn test_exactly_one_fetch_per_mount() {
        let mut view = view(StaticRepository::with_topics(scenario_topics()));
        view.mount().await;
        assert_eq!(view.mount().await, MountOutcome::AlreadyMounted);

        view.toggle_topic("t1");
        view.toggle_formula(&FormulaKey::new("t1", 0, 0));
        view.toggle_topic("t1");

        assert_eq!(view.repository().calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_renders_like_empty_collection() {
        let mut failed = view(StaticRepository::failing(AppError::Network(
            "unreachable".to_string(),
        )));
        let mut empty = view(StaticRepository::with_topics(Vec::new()));

        assert_eq!(failed.mount().await, MountOutcome::Settled(Settled::Empty));
        assert_eq!(empty.mount().await, MountOutcome::Settled(Settled::Empty));

        let kit = TerminalToolkit::plain();
        assert_eq!(render(failed.state(), &kit), render(empty.state(), &kit));

        assert_eq!(
            failed.failure(),
            Some(&AppError::Network("unreachable".to_string()))
        );
        assert_eq!(empty.failure(), None);
    }

    struct Stalled;

    #[async_trait::async_trait]
    impl TopicRepository for Stalled {
        async fn fetch_topics(&self) -> crate::utils::error::AppResult<Vec<Topic>> {
            std::future::pending().await
        }

        fn describe(&self) -> String {
            "stalled".to_string()
        }
    }

    #[tokio::test]
    async fn test_cancel_drops_fetch_and_stays_loading() {
        let mut view = TopicView::new(Stalled, ViewState::new(FormulaPolicy::Single));

        assert_eq!(view.mount_until(async {}).await, MountOutcome::Cancelled);
        assert_eq!(view.state().phase(), &Phase::Loading);
        assert!(!view.toggle_topic("t1"));

        // Cancellation counts as the one mount
        assert_eq!(view.mount().await, MountOutcome::AlreadyMounted);
    }
}
