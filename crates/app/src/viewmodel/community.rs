//! Community discussion view model
//!
//! Class sessions, their posts, and per-post comment threads. Comment
//! submissions are tracked per post so that threads do not block each other.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tracing::{debug, info, warn};
use tutorhub_core::forms::validate_comment;
use tutorhub_core::{Action, ClassSession, ClassSessionId, Post, PostForm, PostId};

use super::{report_failure, report_invalid, require, ActionError};
use crate::state::{lock, AppState};

#[derive(Default)]
struct CommunityPage {
    sessions: Vec<ClassSession>,
    selected: Option<ClassSessionId>,
    posts: Vec<Post>,
    creating_post: bool,
    comment_drafts: HashMap<PostId, String>,
}

pub struct CommunityViewModel {
    state: AppState,
    page: Mutex<CommunityPage>,
    submitting: Mutex<HashSet<PostId>>,
}

impl CommunityViewModel {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            page: Mutex::new(CommunityPage::default()),
            submitting: Mutex::new(HashSet::new()),
        }
    }

    /// List sessions, selecting the first one if nothing is selected yet
    pub async fn load(&self) -> Result<(), ActionError> {
        let sessions = self
            .state
            .api
            .community_sessions()
            .await
            .map_err(|e| report_failure(&self.state.notifier, "load_sessions", &e))?;

        let to_select = {
            let mut page = lock(&self.page);
            page.sessions = sessions;
            let selected = page.selected;
            match selected {
                Some(id) if page.sessions.iter().any(|s| s.id == id) => Some(id),
                _ => {
                    page.selected = None;
                    page.posts.clear();
                    page.sessions.first().map(|s| s.id)
                }
            }
        };

        match to_select {
            Some(id) => self.select_session(id).await,
            None => Ok(()),
        }
    }

    pub fn sessions(&self) -> Vec<ClassSession> {
        lock(&self.page).sessions.clone()
    }

    pub fn selected_session(&self) -> Option<ClassSessionId> {
        lock(&self.page).selected
    }

    pub fn posts(&self) -> Vec<Post> {
        lock(&self.page).posts.clone()
    }

    pub async fn select_session(&self, id: ClassSessionId) -> Result<(), ActionError> {
        {
            let mut page = lock(&self.page);
            if !page.sessions.iter().any(|s| s.id == id) {
                return Err(ActionError::NotFound);
            }
            if page.selected != Some(id) {
                page.selected = Some(id);
                page.posts.clear();
            }
        }
        self.fetch_posts(id)
            .await
            .map_err(|e| report_failure(&self.state.notifier, "load_posts", &e))
    }

    async fn fetch_posts(&self, session_id: ClassSessionId) -> tutorhub_net::Result<()> {
        let posts = self.state.api.community_posts(session_id).await?;
        debug!(session_id, posts = posts.len(), "Posts fetched");

        let mut page = lock(&self.page);
        // The user may have moved to another session meanwhile
        if page.selected == Some(session_id) {
            page.posts = posts;
        }
        Ok(())
    }

    async fn refresh_posts(&self) {
        let Some(session_id) = self.selected_session() else {
            return;
        };
        if let Err(e) = self.fetch_posts(session_id).await {
            warn!(session_id, error = %e, "Post re-fetch failed");
        }
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Result<(), ActionError> {
        require(&self.state.session, Action::CreatePost)?;

        let validated = {
            let mut page = lock(&self.page);
            let Some(session_id) = page.selected else {
                return Err(ActionError::NotFound);
            };
            if page.creating_post {
                return Err(ActionError::Busy);
            }
            let form = PostForm {
                title: title.to_string(),
                content: content.to_string(),
            };
            let validated = form.validate(session_id);
            if validated.is_ok() {
                page.creating_post = true;
            }
            validated
        };
        let post = validated.map_err(|e| report_invalid(&self.state.notifier, e))?;

        let result = self.state.api.create_post(&post).await;
        lock(&self.page).creating_post = false;

        match result {
            Ok(()) => {
                info!(session_id = post.session_id, "Post created");
                self.state.notifier.success("Post published");
                self.refresh_posts().await;
                Ok(())
            }
            Err(e) => {
                let err = report_failure(&self.state.notifier, "create_post", &e);
                self.refresh_posts().await;
                Err(err)
            }
        }
    }

    pub fn set_comment_draft(&self, post_id: PostId, text: impl Into<String>) {
        lock(&self.page).comment_drafts.insert(post_id, text.into());
    }

    pub fn comment_draft(&self, post_id: PostId) -> String {
        lock(&self.page)
            .comment_drafts
            .get(&post_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether a comment on this post is in flight
    pub fn is_submitting(&self, post_id: PostId) -> bool {
        lock(&self.submitting).contains(&post_id)
    }

    pub async fn submit_comment(&self, post_id: PostId, content: &str) -> Result<(), ActionError> {
        require(&self.state.session, Action::CreateComment)?;

        let comment =
            validate_comment(post_id, content).map_err(|e| report_invalid(&self.state.notifier, e))?;

        if !lock(&self.submitting).insert(post_id) {
            return Err(ActionError::Busy);
        }
        let result = self.state.api.create_comment(&comment).await;
        lock(&self.submitting).remove(&post_id);

        match result {
            Ok(()) => {
                info!(post_id, "Comment added");
                lock(&self.page).comment_drafts.remove(&post_id);
                self.refresh_posts().await;
                Ok(())
            }
            Err(e) => {
                let err = report_failure(&self.state.notifier, "create_comment", &e);
                self.refresh_posts().await;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastLevel;
    use crate::testing::{app_state, class_session, post, student, Failure, MemoryApi};
    use std::sync::Arc;

    fn community() -> (Arc<CommunityViewModel>, AppState, Arc<MemoryApi>) {
        let (state, api) = app_state(
            MemoryApi::new().logged_in_as(student()).with_community(
                vec![class_session(1, "Calculus I"), class_session(2, "Statistics")],
                vec![
                    post(7, 1, "Homework 3"),
                    post(42, 1, "Exam prep"),
                    post(50, 2, "Intro"),
                ],
            ),
        );
        (Arc::new(CommunityViewModel::new(state.clone())), state, api)
    }

    #[tokio::test]
    async fn test_load_selects_first_session() {
        let (vm, _state, _api) = community();
        vm.load().await.unwrap();

        assert_eq!(vm.selected_session(), Some(1));
        let ids: Vec<_> = vm.posts().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 42]);

        vm.select_session(2).await.unwrap();
        assert_eq!(vm.posts().len(), 1);
        assert_eq!(vm.select_session(9).await, Err(ActionError::NotFound));
    }

    #[tokio::test]
    async fn test_empty_post_rejected_locally() {
        let (vm, state, api) = community();
        vm.load().await.unwrap();

        assert!(matches!(
            vm.create_post("   ", "body").await,
            Err(ActionError::Invalid(_))
        ));
        assert!(matches!(
            vm.create_post("Title", "").await,
            Err(ActionError::Invalid(_))
        ));
        assert_eq!(api.call_count("create_post"), 0);
        assert_eq!(state.notifier.latest().unwrap().level, ToastLevel::Warning);
    }

    #[tokio::test]
    async fn test_post_appears_after_refetch() {
        let (vm, _state, api) = community();
        vm.load().await.unwrap();

        vm.create_post("Office hours?", "When are they this week?")
            .await
            .unwrap();
        assert_eq!(api.call_count("community_posts"), 2);
        assert!(vm.posts().iter().any(|p| p.title == "Office hours?"));
    }

    #[tokio::test]
    async fn test_empty_comment_rejected() {
        let (vm, _state, api) = community();
        vm.load().await.unwrap();
        assert!(matches!(
            vm.submit_comment(7, "  ").await,
            Err(ActionError::Invalid(_))
        ));
        assert_eq!(api.call_count("create_comment"), 0);
        assert!(!vm.is_submitting(7));
    }

    #[tokio::test]
    async fn test_comments_on_different_posts_do_not_block() {
        let (vm, _state, api) = community();
        vm.load().await.unwrap();
        let gate = api.hold_comments_on(7);

        let slow = {
            let vm = vm.clone();
            tokio::spawn(async move { vm.submit_comment(7, "First!").await })
        };
        while !vm.is_submitting(7) {
            tokio::task::yield_now().await;
        }

        // Same post is refused while in flight
        assert_eq!(vm.submit_comment(7, "Again").await, Err(ActionError::Busy));

        vm.submit_comment(42, "Thanks!").await.unwrap();
        assert!(vm.is_submitting(7));
        assert!(!vm.is_submitting(42));
        let thread = vm.posts().into_iter().find(|p| p.id == 42).unwrap();
        assert_eq!(thread.comments[0].content, "Thanks!");

        gate.notify_one();
        slow.await.unwrap().unwrap();
        assert!(!vm.is_submitting(7));
    }

    #[tokio::test]
    async fn test_failed_submissions_refetch_posts() {
        let (vm, state, api) = community();
        vm.load().await.unwrap();
        let fetches = api.call_count("community_posts");

        api.fail_next(Failure::Rejected(404, "Post not found"));
        vm.set_comment_draft(42, "Thanks!");
        assert_eq!(
            vm.submit_comment(42, "Thanks!").await,
            Err(ActionError::Rejected("Post not found".to_string()))
        );
        assert_eq!(api.call_count("community_posts"), fetches + 1);
        assert_eq!(vm.comment_draft(42), "Thanks!");
        assert!(!vm.is_submitting(42));

        api.fail_next(Failure::Network);
        assert_eq!(
            vm.create_post("Office hours?", "When?").await,
            Err(ActionError::Network)
        );
        assert_eq!(api.call_count("community_posts"), fetches + 2);
        assert_eq!(state.notifier.latest().unwrap().level, ToastLevel::Error);
        assert_eq!(vm.posts().len(), 2);
    }

    #[tokio::test]
    async fn test_draft_cleared_after_comment() {
        let (vm, _state, _api) = community();
        vm.load().await.unwrap();

        vm.set_comment_draft(42, "Thanks!");
        assert_eq!(vm.comment_draft(42), "Thanks!");
        vm.submit_comment(42, &vm.comment_draft(42)).await.unwrap();
        assert_eq!(vm.comment_draft(42), "");
    }
}
