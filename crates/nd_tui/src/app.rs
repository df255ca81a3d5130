use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nd_client::{ArticleScope, AuthProvider, NewsApi};
use nd_core::{SessionStore, SignUpOutcome, UserPreferences};

use crate::notify::Notifier;
use crate::share::{share_article, open_in_browser, SharePlatform};
use crate::task::TaskHandle;
use crate::views::home::HomeView;
use crate::views::login::{LoginAction, LoginForm};
use crate::views::saved::SavedView;
use crate::views::signup::{SignupAction, SignupForm};
use crate::widgets::preferences::{ClosePolicy, PreferencesForm};

const INITIAL_FETCH_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Home,
    Saved,
}

/// The whole client: four routes behind an auth gate, per-view state,
/// and pass-through calls to the injected auth provider and news API.
/// User-initiated mutations are awaited inline; mount-time fetches and
/// the preferences save run as abort-on-drop tasks polled from
/// [`App::on_tick`].
pub struct App {
    pub route: Route,
    session: Arc<dyn SessionStore>,
    auth: Arc<dyn AuthProvider>,
    api: Arc<dyn NewsApi>,
    share: Box<dyn SharePlatform>,
    pub close_policy: ClosePolicy,
    pub notifier: Notifier,
    pub login: LoginForm,
    pub signup: SignupForm,
    pub home: HomeView,
    pub saved: SavedView,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        session: Arc<dyn SessionStore>,
        auth: Arc<dyn AuthProvider>,
        api: Arc<dyn NewsApi>,
        share: Box<dyn SharePlatform>,
        close_policy: ClosePolicy,
    ) -> Self {
        Self {
            route: Route::Login,
            session,
            auth,
            api,
            share,
            close_policy,
            notifier: Notifier::new(),
            login: LoginForm::default(),
            signup: SignupForm::default(),
            home: HomeView::default(),
            saved: SavedView::default(),
            should_quit: false,
        }
    }

    /// Route change with the auth gate: protected routes fall back to
    /// the sign-in view when no session exists. Entering a protected
    /// route starts its mount fetch; leaving drops whatever fetch was
    /// still in flight.
    pub fn navigate(&mut self, route: Route) {
        self.home.fetch = None;
        self.saved.fetch = None;

        self.route = match route {
            Route::Home | Route::Saved if self.session.user_id().is_none() => Route::Login,
            route => route,
        };

        match self.route {
            Route::Home => self.start_home_fetch(ArticleScope::Recent(INITIAL_FETCH_LIMIT)),
            Route::Saved => self.start_saved_fetch(),
            _ => {}
        }
    }

    fn start_home_fetch(&mut self, scope: ArticleScope) {
        let (Some(token), Some(user_id)) =
            (self.session.access_token(), self.session.user_id())
        else {
            return;
        };
        let api = self.api.clone();
        self.home.fetch = Some(TaskHandle::spawn(async move {
            api.fetch_articles(&token, &user_id, scope).await
        }));
    }

    fn start_saved_fetch(&mut self) {
        let (Some(token), Some(user_id)) =
            (self.session.access_token(), self.session.user_id())
        else {
            return;
        };
        let api = self.api.clone();
        self.saved.fetch = Some(TaskHandle::spawn(async move {
            api.saved_articles(&token, &user_id).await
        }));
    }

    /// Polls in-flight work and expires notices. Called once per loop
    /// iteration.
    pub fn on_tick(&mut self) {
        self.notifier.prune(Instant::now());

        if let Some(handle) = self.home.fetch.as_mut() {
            if let Some(outcome) = handle.try_finish() {
                self.home.fetch = None;
                match outcome {
                    Some(Ok(articles)) => self.home.replace_articles(articles),
                    Some(Err(e)) => {
                        tracing::warn!("article fetch failed: {}", e);
                        self.notifier.error("Failed to fetch articles");
                    }
                    None => {}
                }
            }
        }

        if let Some(handle) = self.saved.fetch.as_mut() {
            if let Some(outcome) = handle.try_finish() {
                self.saved.fetch = None;
                match outcome {
                    Some(Ok(articles)) => self.saved.articles = articles,
                    Some(Err(e)) => {
                        tracing::warn!("saved fetch failed: {}", e);
                        self.notifier.error("Failed to fetch saved articles");
                    }
                    None => {}
                }
            }
        }

        if let Some((handle, _)) = self.home.pending_update.as_mut() {
            if let Some(outcome) = handle.try_finish() {
                if let Some((_, draft)) = self.home.pending_update.take() {
                    match outcome {
                        Some(Ok(_)) => {
                            self.home.preferences = draft;
                            if self.close_policy == ClosePolicy::OnSuccess {
                                self.home.dialog = None;
                            }
                            self.start_home_fetch(ArticleScope::All);
                            self.notifier.success("Preferences updated successfully");
                        }
                        Some(Err(e)) => {
                            tracing::warn!("preferences update failed: {}", e);
                            self.notifier.error("Failed to update preferences");
                        }
                        None => {}
                    }
                    // Cleared last, whatever the outcome.
                    self.home.is_updating = false;
                }
            }
        }
    }

    pub async fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.should_quit = true;
            return;
        }

        match self.route {
            Route::Login => self.on_login_key(key).await,
            Route::Signup => self.on_signup_key(key).await,
            Route::Home => self.on_home_key(key).await,
            Route::Saved => self.on_saved_key(key).await,
        }
    }

    async fn on_login_key(&mut self, key: KeyEvent) {
        match self.login.handle_key(key) {
            LoginAction::Submit { email, password } => self.sign_in(&email, &password).await,
            LoginAction::Invalid(reason) => self.notifier.error(reason),
            LoginAction::GoToSignup => self.navigate(Route::Signup),
            LoginAction::None => {}
        }
    }

    async fn on_signup_key(&mut self, key: KeyEvent) {
        match self.signup.handle_key(key) {
            SignupAction::Submit { email, password } => self.sign_up(&email, &password).await,
            SignupAction::Invalid(reason) => self.notifier.error(reason),
            SignupAction::GoToLogin => self.navigate(Route::Login),
            SignupAction::None => {}
        }
    }

    async fn on_home_key(&mut self, key: KeyEvent) {
        // The save-in-flight overlay blocks the whole view.
        if self.home.is_updating {
            return;
        }

        if self.home.dialog.is_some() {
            self.on_dialog_key(key).await;
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.home.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.home.select_prev(),
            KeyCode::Char('s') => self.save_selected().await,
            KeyCode::Char('c') => self.share_selected(),
            KeyCode::Char('o') => self.open_selected(),
            KeyCode::Char('p') => {
                self.home.dialog = Some(PreferencesForm::seeded(&self.home.preferences));
            }
            KeyCode::Char('v') => self.navigate(Route::Saved),
            KeyCode::Char('l') => self.sign_out().await,
            _ => {}
        }
    }

    async fn on_dialog_key(&mut self, key: KeyEvent) {
        let Some(form) = self.home.dialog.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.home.dialog = None,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left => form.cycle(-1),
            KeyCode::Right => form.cycle(1),
            KeyCode::Enter => {
                let draft = form.submit();
                self.submit_preferences(draft);
            }
            _ => {}
        }
    }

    async fn on_saved_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => self.navigate(Route::Home),
            KeyCode::Down | KeyCode::Char('j') => self.saved.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.saved.select_prev(),
            // Saving is disabled on this view; the card is read-only.
            KeyCode::Char('s') => {}
            KeyCode::Char('c') => {
                if let Some(article) = self.saved.selected_article().cloned() {
                    share_article(self.share.as_mut(), &mut self.notifier, &article);
                }
            }
            KeyCode::Char('o') => {
                if let Some(article) = self.saved.selected_article() {
                    if open_in_browser(&article.url).is_err() {
                        self.notifier.error("Failed to open article");
                    }
                }
            }
            _ => {}
        }
    }

    async fn sign_in(&mut self, email: &str, password: &str) {
        match self.auth.sign_in(email, password).await {
            Ok(session) => {
                self.session.set(session);
                self.login.reset();
                self.navigate(Route::Home);
            }
            // Provider message verbatim.
            Err(e) => self.notifier.error(e.to_string()),
        }
    }

    async fn sign_up(&mut self, email: &str, password: &str) {
        match self.auth.sign_up(email, password).await {
            Ok(outcome) => {
                if outcome == SignUpOutcome::VerificationRequired {
                    self.notifier
                        .info("Please check your email to verify your account");
                }
                self.signup.reset();
                // Transition policy: always back to sign-in.
                self.navigate(Route::Login);
            }
            Err(e) => self.notifier.error(e.to_string()),
        }
    }

    async fn sign_out(&mut self) {
        if let Some(session) = self.session.session() {
            if let Err(e) = self.auth.sign_out(&session).await {
                tracing::warn!("sign-out call failed: {}", e);
            }
        }
        self.session.clear();
        self.navigate(Route::Login);
    }

    async fn save_selected(&mut self) {
        let Some(article) = self.home.selected_article().cloned() else {
            return;
        };
        let (Some(token), Some(user_id)) =
            (self.session.access_token(), self.session.user_id())
        else {
            return;
        };
        match self.api.save_article(&token, &user_id, &article).await {
            Ok(_) => self.notifier.success("Article saved successfully"),
            Err(e) => {
                tracing::warn!("save failed: {}", e);
                self.notifier.error("Failed to save article");
            }
        }
    }

    fn share_selected(&mut self) {
        if let Some(article) = self.home.selected_article().cloned() {
            share_article(self.share.as_mut(), &mut self.notifier, &article);
        }
    }

    fn open_selected(&mut self) {
        if let Some(article) = self.home.selected_article() {
            if open_in_browser(&article.url).is_err() {
                self.notifier.error("Failed to open article");
            }
        }
    }

    /// Kicks off the preferences upsert. The dialog closes now or on
    /// confirmed success depending on the configured policy; the
    /// in-flight flag stays up until [`App::on_tick`] sees the result.
    fn submit_preferences(&mut self, draft: UserPreferences) {
        let (Some(token), Some(user_id)) =
            (self.session.access_token(), self.session.user_id())
        else {
            return;
        };

        self.home.is_updating = true;
        if self.close_policy == ClosePolicy::Immediate {
            self.home.dialog = None;
        }

        let api = self.api.clone();
        let submitted = draft.clone();
        let handle = TaskHandle::spawn(async move {
            api.update_preferences(&token, &user_id, &submitted).await
        });
        self.home.pending_update = Some((handle, draft));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nd_client::MemoryBackend;
    use nd_core::{
        Error, MemorySession, NewsArticle, Result, Session,
    };
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::notify::NoticeLevel;
    use crate::share::{ShareError, SharePayload};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fetch(ArticleScope),
        Save(String),
        Saved,
        Update(UserPreferences),
    }

    /// MemoryBackend with a call log, standing in for both the identity
    /// provider and the news API.
    struct Recording {
        backend: MemoryBackend,
        api_calls: Mutex<Vec<Call>>,
        auth_calls: AtomicUsize,
        fail_updates: AtomicBool,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                backend: MemoryBackend::new(),
                api_calls: Mutex::new(Vec::new()),
                auth_calls: AtomicUsize::new(0),
                fail_updates: AtomicBool::new(false),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.api_calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.api_calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AuthProvider for Recording {
        async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
            self.auth_calls.fetch_add(1, Ordering::SeqCst);
            self.backend.sign_in(email, password).await
        }

        async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
            self.auth_calls.fetch_add(1, Ordering::SeqCst);
            self.backend.sign_up(email, password).await
        }

        async fn sign_out(&self, session: &Session) -> Result<()> {
            self.backend.sign_out(session).await
        }
    }

    #[async_trait]
    impl NewsApi for Recording {
        async fn fetch_articles(
            &self,
            token: &str,
            user_id: &str,
            scope: ArticleScope,
        ) -> Result<Vec<NewsArticle>> {
            self.record(Call::Fetch(scope));
            self.backend.fetch_articles(token, user_id, scope).await
        }

        async fn save_article(
            &self,
            token: &str,
            user_id: &str,
            article: &NewsArticle,
        ) -> Result<String> {
            self.record(Call::Save(article.title.clone()));
            self.backend.save_article(token, user_id, article).await
        }

        async fn saved_articles(&self, token: &str, user_id: &str) -> Result<Vec<NewsArticle>> {
            self.record(Call::Saved);
            self.backend.saved_articles(token, user_id).await
        }

        async fn update_preferences(
            &self,
            token: &str,
            user_id: &str,
            preferences: &UserPreferences,
        ) -> Result<String> {
            self.record(Call::Update(preferences.clone()));
            if self.fail_updates.load(Ordering::SeqCst) {
                return Err(Error::Api("update rejected".to_string()));
            }
            self.backend
                .update_preferences(token, user_id, preferences)
                .await
        }
    }

    struct NoShare;

    impl SharePlatform for NoShare {
        fn share(&mut self, _payload: &SharePayload) -> std::result::Result<(), ShareError> {
            Err(ShareError::Unsupported)
        }

        fn copy_to_clipboard(&mut self, _text: &str) -> std::result::Result<(), ShareError> {
            Ok(())
        }
    }

    fn article(n: usize) -> NewsArticle {
        NewsArticle {
            id: format!("a{}", n),
            title: format!("Title {}", n),
            summary: format!("Summary {}", n),
            sentiment_label: "POSITIVE".to_string(),
            sentiment_explanation: "Upbeat".to_string(),
            url: format!("https://example.com/{}", n),
        }
    }

    async fn fixture(seeded_articles: usize) -> (App, Arc<Recording>) {
        let recording = Arc::new(Recording::new());
        let user_id = recording
            .backend
            .seed_account("reader@example.com", "hunter2")
            .await;
        for n in 0..seeded_articles {
            recording.backend.seed_article(&user_id, article(n)).await;
        }

        let app = App::new(
            Arc::new(MemorySession::new()),
            recording.clone(),
            recording.clone(),
            Box::new(NoShare),
            ClosePolicy::Immediate,
        );
        (app, recording)
    }

    async fn settle(app: &mut App) {
        for _ in 0..200 {
            tokio::task::yield_now().await;
            app.on_tick();
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn has_notice(app: &App, level: NoticeLevel) -> bool {
        app.notifier.active().iter().any(|n| n.level == level)
    }

    #[tokio::test]
    async fn test_gate_redirects_unauthenticated_visits() {
        let (mut app, _) = fixture(0).await;
        app.navigate(Route::Home);
        assert_eq!(app.route, Route::Login);
        app.navigate(Route::Saved);
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_sign_in_then_sign_out_round_trip() {
        let (mut app, _) = fixture(0).await;

        app.sign_in("reader@example.com", "hunter2").await;
        assert_eq!(app.route, Route::Home);

        app.sign_out().await;
        assert_eq!(app.route, Route::Login);

        // The gate holds again after sign-out.
        app.navigate(Route::Home);
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_sign_in_failure_surfaces_provider_message() {
        let (mut app, _) = fixture(0).await;
        app.sign_in("reader@example.com", "wrong").await;
        assert_eq!(app.route, Route::Login);
        let notices = app.notifier.active();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "Incorrect email or password");
    }

    #[tokio::test]
    async fn test_signup_mismatch_never_calls_provider() {
        let (mut app, recording) = fixture(0).await;
        app.navigate(Route::Signup);
        app.signup.email = "new@example.com".to_string();
        app.signup.password = "hunter2".to_string();
        app.signup.confirm = "hunter3".to_string();

        app.on_key(key(KeyCode::Enter)).await;

        assert_eq!(recording.auth_calls.load(Ordering::SeqCst), 0);
        assert!(has_notice(&app, NoticeLevel::Error));
        assert_eq!(app.route, Route::Signup);
    }

    #[tokio::test]
    async fn test_signup_navigates_to_login() {
        let (mut app, recording) = fixture(0).await;
        app.navigate(Route::Signup);
        app.signup.email = "new@example.com".to_string();
        app.signup.password = "hunter2".to_string();
        app.signup.confirm = "hunter2".to_string();

        app.on_key(key(KeyCode::Enter)).await;

        assert_eq!(recording.auth_calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.route, Route::Login);
    }

    #[tokio::test]
    async fn test_initial_fetch_populates_ten_newest() {
        let (mut app, recording) = fixture(12).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;

        assert_eq!(app.home.articles.len(), 10);
        // Newest first.
        assert_eq!(app.home.articles[0].id, "a11");
        assert_eq!(recording.calls(), vec![Call::Fetch(ArticleScope::Recent(10))]);
    }

    #[tokio::test]
    async fn test_save_carries_selected_articles_fields() {
        let (mut app, recording) = fixture(3).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;

        app.on_key(key(KeyCode::Down)).await;
        app.on_key(key(KeyCode::Char('s'))).await;

        let saved_title = app.home.articles[1].title.clone();
        assert!(recording.calls().contains(&Call::Save(saved_title)));
        assert!(has_notice(&app, NoticeLevel::Success));
        // Saving never mutates the local list.
        assert_eq!(app.home.articles.len(), 3);
    }

    #[tokio::test]
    async fn test_preferences_success_updates_state_and_refetches() {
        let (mut app, recording) = fixture(2).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;

        let draft = UserPreferences {
            topics: "Science".to_string(),
            sources: "Reuters".to_string(),
            language: "fr".to_string(),
        };
        app.submit_preferences(draft.clone());
        assert!(app.home.is_updating);
        settle(&mut app).await;

        assert_eq!(app.home.preferences, draft);
        assert!(!app.home.is_updating);
        let calls = recording.calls();
        assert!(calls.contains(&Call::Update(draft)));
        // The post-update reload uses the broad scope.
        assert_eq!(calls.last(), Some(&Call::Fetch(ArticleScope::All)));
    }

    #[tokio::test]
    async fn test_preferences_failure_leaves_state_untouched() {
        let (mut app, recording) = fixture(2).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;
        recording.fail_updates.store(true, Ordering::SeqCst);

        let before = app.home.preferences.clone();
        app.submit_preferences(UserPreferences {
            topics: "Sports".to_string(),
            ..before.clone()
        });
        settle(&mut app).await;

        assert_eq!(app.home.preferences, before);
        assert!(!app.home.is_updating);
        assert!(has_notice(&app, NoticeLevel::Error));
        // No follow-up fetch after a failed upsert.
        assert!(!recording.calls().contains(&Call::Fetch(ArticleScope::All)));
    }

    #[tokio::test]
    async fn test_dialog_closes_immediately_by_default() {
        let (mut app, _) = fixture(0).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;

        app.on_key(key(KeyCode::Char('p'))).await;
        assert!(app.home.dialog.is_some());
        app.on_key(key(KeyCode::Enter)).await;
        // Closed before the save resolved.
        assert!(app.home.dialog.is_none());
        assert!(app.home.is_updating);
        settle(&mut app).await;
        assert!(!app.home.is_updating);
    }

    #[tokio::test]
    async fn test_dialog_close_on_success_policy() {
        let (mut app, recording) = fixture(0).await;
        app.close_policy = ClosePolicy::OnSuccess;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;

        recording.fail_updates.store(true, Ordering::SeqCst);
        app.on_key(key(KeyCode::Char('p'))).await;
        app.on_key(key(KeyCode::Enter)).await;
        assert!(app.home.dialog.is_some());
        settle(&mut app).await;
        // Failed save leaves the dialog open under this policy.
        assert!(app.home.dialog.is_some());

        recording.fail_updates.store(false, Ordering::SeqCst);
        app.on_key(key(KeyCode::Enter)).await;
        settle(&mut app).await;
        assert!(app.home.dialog.is_none());
    }

    #[tokio::test]
    async fn test_overlay_blocks_home_controls_while_updating() {
        let (mut app, recording) = fixture(1).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;
        let fetches_before = recording.calls().len();

        app.home.is_updating = true;
        app.on_key(key(KeyCode::Char('s'))).await;
        app.on_key(key(KeyCode::Char('v'))).await;
        app.on_key(key(KeyCode::Char('l'))).await;

        assert_eq!(app.route, Route::Home);
        assert_eq!(recording.calls().len(), fetches_before);
    }

    #[tokio::test]
    async fn test_saved_view_save_is_a_noop() {
        let (mut app, recording) = fixture(1).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;

        // Save one article, then view it on the saved route.
        app.on_key(key(KeyCode::Char('s'))).await;
        app.on_key(key(KeyCode::Char('v'))).await;
        settle(&mut app).await;
        assert_eq!(app.route, Route::Saved);
        assert_eq!(app.saved.articles.len(), 1);

        let calls_before = recording.calls().len();
        app.on_key(key(KeyCode::Char('s'))).await;
        assert_eq!(recording.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_share_falls_back_to_clipboard_success() {
        let (mut app, _) = fixture(1).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;

        app.on_key(key(KeyCode::Char('c'))).await;
        assert!(has_notice(&app, NoticeLevel::Success));
        assert!(!has_notice(&app, NoticeLevel::Error));
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_prior_list() {
        let (mut app, recording) = fixture(2).await;
        app.sign_in("reader@example.com", "hunter2").await;
        settle(&mut app).await;
        assert_eq!(app.home.articles.len(), 2);

        // Invalidate the token behind the app's back, then force a
        // refetch; the stale list must survive.
        let session = app.session.session().unwrap();
        recording.backend.sign_out(&session).await.unwrap();
        app.start_home_fetch(ArticleScope::Recent(10));
        settle(&mut app).await;

        assert_eq!(app.home.articles.len(), 2);
        assert!(has_notice(&app, NoticeLevel::Error));
    }
}
