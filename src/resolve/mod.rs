//! theme resolution controller stuff
use {
    crate::{
        apply::TokenApplier,
        error::Result,
        fonts::FontResolver,
        source::ThemeSource,
        theme::{FALLBACK_THEME_NAME, ThemeDefinition, fallback::fallback_theme},
    },
    hashbrown::HashSet,
    std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    tokio::sync::RwLock,
    tracing::{debug, info, warn},
};

/// where a resolution attempt currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus {
    /// a resolution is in flight; consumers gate visible content on this
    /// and on font readiness, not on theme presence alone
    Loading,

    /// the requested theme resolved and its fonts settled
    Ready,

    /// the primary source failed and the built-in default took its place
    Fallback,

    /// even the fallback could not be constructed; unreachable by
    /// construction since the fallback is a compile-time constant
    Error,
}

/// the mutable resolution state, one instance per controller
#[derive(Debug, Clone)]
pub struct ResolutionState {
    /// where resolution stands
    pub status: ResolutionStatus,

    /// the theme consumers should render with
    pub current: Option<ThemeDefinition>,

    /// human-readable recovery note, when a source call failed
    pub error_message: Option<String>,

    /// whether the current theme's fonts have settled
    pub fonts_ready: bool,
}

impl Default for ResolutionState {
    fn default() -> Self {
        Self {
            status: ResolutionStatus::Loading,
            current: None,
            error_message: None,
            fonts_ready: false,
        }
    }
}

/// the read-only snapshot handed to rendering code
///
/// the sole contract rendering layers may depend on
#[derive(Debug, Clone)]
pub struct ThemeSnapshot {
    /// the resolved theme, when one exists
    pub theme: Option<ThemeDefinition>,

    /// whether visible content should still be gated
    pub is_loading: bool,

    /// the recovery note, if any; never fatal, only informational
    pub error: Option<String>,

    /// whether fonts for the current theme have settled
    pub fonts_ready: bool,
}

/// orchestrates source selection, fallback and font-readiness gating
///
/// the only component that mutates [`ResolutionState`]; tokens and their
/// fonts always arrive together because the applier runs only after the
/// same attempt's fonts settled
pub struct ThemeController {
    /// where theme definitions come from
    source: Arc<dyn ThemeSource>,

    /// font readiness tracking
    fonts: FontResolver,

    /// the single write path into presentation
    applier: TokenApplier,

    /// the resolution state machine
    state: RwLock<ResolutionState>,

    /// monotonically increasing attempt counter; a resolution that is no
    /// longer the newest when its fonts settle is discarded so a stale
    /// slow attempt cannot overwrite a newer fast one
    attempts: AtomicU64,
}

impl ThemeController {
    /// make a controller over a source, font resolver and applier
    pub fn new(source: Arc<dyn ThemeSource>, fonts: FontResolver, applier: TokenApplier) -> Self {
        Self {
            source,
            fonts,
            applier,
            state: RwLock::new(ResolutionState::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// initial load: fetch the selected theme, falling back to the
    /// built-in default when the source is unavailable
    ///
    /// either way the ui is never left unstyled: some theme always gets
    /// resolved, font-confirmed and applied
    pub async fn load(&self) {
        let attempt = self.begin_attempt().await;

        match self.source.fetch_current().await {
            Ok(theme) => {
                info!(theme = %theme.name, "theme resolved");
                self.commit(attempt, theme, ResolutionStatus::Ready, None)
                    .await;
            }
            Err(e) => {
                warn!(error = %e, "theme source unavailable, using fallback");
                self.commit(
                    attempt,
                    fallback_theme(),
                    ResolutionStatus::Fallback,
                    Some(format!("failed to load theme, using fallback: {e}")),
                )
                .await;
            }
        }
    }

    /// switch to a named theme: persist the selection, then re-run the
    /// full resolution sequence against it
    ///
    /// a failed switch keeps what was showing: the state reverts to the
    /// previous current theme when one exists, else to the fallback
    pub async fn switch_theme(&self, name: &str) {
        let previous = self.published().await;
        let attempt = self.begin_attempt().await;

        let fetched = match self.source.set_current(name).await {
            Ok(()) => self.source.fetch_current().await,
            Err(e) => Err(e),
        };

        match fetched {
            Ok(theme) => {
                info!(theme = %theme.name, "switched theme");
                self.commit(attempt, theme, ResolutionStatus::Ready, None)
                    .await;
            }
            Err(e) => {
                warn!(theme = %name, error = %e, "theme switch failed, keeping previous theme");
                self.revert(attempt, previous, format!("failed to switch to '{name}': {e}"))
                    .await;
            }
        }
    }

    /// re-fetch the current selection without changing it, picking up
    /// out-of-band edits to the active theme
    pub async fn refresh_theme(&self) {
        let previous = self.published().await;
        let attempt = self.begin_attempt().await;

        match self.source.fetch_current().await {
            Ok(theme) => {
                info!(theme = %theme.name, "theme refreshed");
                self.commit(attempt, theme, ResolutionStatus::Ready, None)
                    .await;
            }
            Err(e) => {
                warn!(error = %e, "theme refresh failed, keeping previous theme");
                self.revert(attempt, previous, format!("failed to refresh theme: {e}"))
                    .await;
            }
        }
    }

    /// the read-only snapshot for rendering code
    pub async fn snapshot(&self) -> ThemeSnapshot {
        let state = self.state.read().await;

        ThemeSnapshot {
            theme: state.current.clone(),
            is_loading: state.status == ResolutionStatus::Loading || !state.fonts_ready,
            error: state.error_message.clone(),
            fonts_ready: state.fonts_ready,
        }
    }

    /// the full resolution state
    pub async fn state(&self) -> ResolutionState {
        self.state.read().await.clone()
    }

    /// font families confirmed loaded this session
    pub async fn loaded_fonts(&self) -> HashSet<String> {
        self.fonts.loaded_fonts().await
    }

    /// the selectable theme names the source offers
    pub async fn list_themes(&self) -> Result<Vec<String>> {
        self.source.list().await
    }

    /// start a new resolution attempt and flip the state to loading
    async fn begin_attempt(&self) -> u64 {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;
        state.status = ResolutionStatus::Loading;
        state.fonts_ready = false;
        state.error_message = None;
        attempt
    }

    /// whether this attempt is still the newest one
    fn is_latest(&self, attempt: u64) -> bool {
        self.attempts.load(Ordering::SeqCst) == attempt
    }

    /// what was published before a new attempt started
    async fn published(&self) -> Option<ThemeDefinition> {
        self.state.read().await.current.clone()
    }

    /// settle fonts for a resolved theme, then publish it and apply its
    /// tokens; the single point where status leaves `Loading`
    async fn commit(
        &self,
        attempt: u64,
        theme: ThemeDefinition,
        status: ResolutionStatus,
        error_message: Option<String>,
    ) {
        self.fonts.resolve(&theme.css_vars.theme).await;

        if !self.is_latest(attempt) {
            debug!(theme = %theme.name, "discarding stale resolution attempt");
            return;
        }

        {
            let mut state = self.state.write().await;
            state.current = Some(theme.clone());
            state.status = status;
            state.error_message = error_message;
            state.fonts_ready = true;
        }

        self.applier.apply(&theme);
    }

    /// restore the previous theme after a failed switch/refresh, or
    /// resolve the fallback when nothing was ever published
    async fn revert(&self, attempt: u64, previous: Option<ThemeDefinition>, message: String) {
        let Some(theme) = previous else {
            self.commit(
                attempt,
                fallback_theme(),
                ResolutionStatus::Fallback,
                Some(message),
            )
            .await;
            return;
        };

        // the previous theme's fonts settled when it was first resolved,
        // so this is a no-op delta
        self.fonts.resolve(&theme.css_vars.theme).await;

        if !self.is_latest(attempt) {
            return;
        }

        let status = if theme.name == FALLBACK_THEME_NAME {
            ResolutionStatus::Fallback
        } else {
            ResolutionStatus::Ready
        };

        let mut state = self.state.write().await;
        state.current = Some(theme);
        state.status = status;
        state.error_message = Some(message);
        state.fonts_ready = true;
        // no re-apply: the style target still holds the previous theme
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            apply::{DocumentStyle, StyleTarget},
            error::ThemeError,
            fonts::FontLoader,
            source::CatalogSource,
            theme::normalize::normalize,
        },
        async_trait::async_trait,
        serde_json::json,
        std::sync::atomic::{AtomicBool, AtomicUsize},
        tokio::sync::Notify,
    };

    /// loader where every family settles immediately
    struct InstantLoader;

    #[async_trait]
    impl FontLoader for InstantLoader {
        async fn load(&self, _family: &str) -> Result<()> {
            Ok(())
        }
    }

    /// style target that counts stylesheet writes
    #[derive(Default)]
    struct CountingTarget {
        /// inner style state
        inner: DocumentStyle,
        /// how many times the stylesheet was replaced
        writes: AtomicUsize,
    }

    impl StyleTarget for CountingTarget {
        fn set_root_property(&self, name: &str, value: &str) {
            self.inner.set_root_property(name, value);
        }

        fn set_stylesheet(&self, css: &str) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set_stylesheet(css);
        }
    }

    /// source whose fetch/set behavior is scripted per test
    struct ScriptedSource {
        /// theme returned on success
        theme: ThemeDefinition,
        /// fail every fetch
        fail_fetch: AtomicBool,
        /// fail every set
        fail_set: AtomicBool,
    }

    impl ScriptedSource {
        fn new(theme: ThemeDefinition) -> Self {
            Self {
                theme,
                fail_fetch: AtomicBool::new(false),
                fail_set: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl ThemeSource for ScriptedSource {
        async fn fetch_current(&self) -> Result<ThemeDefinition> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(ThemeError::SourceUnavailable("scripted failure".into()));
            }
            Ok(self.theme.clone())
        }

        async fn set_current(&self, name: &str) -> Result<()> {
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(ThemeError::SwitchFailed(format!("cannot select '{name}'")));
            }
            Ok(())
        }

        async fn list(&self) -> Result<Vec<String>> {
            Ok(vec![self.theme.name.clone()])
        }
    }

    /// the "vercel" scenario definition from the contract
    fn vercel() -> ThemeDefinition {
        normalize(&json!({
            "name": "vercel",
            "css_vars": {
                "theme": { "font-sans": "Inter" },
                "light": { "background": "#fff" },
                "dark": { "background": "#000" }
            }
        }))
        .unwrap()
    }

    /// controller over a scripted source and counting target
    fn controller(
        source: Arc<dyn ThemeSource>,
    ) -> (ThemeController, Arc<CountingTarget>) {
        let target = Arc::new(CountingTarget::default());
        let fonts = FontResolver::new(Arc::new(InstantLoader), None);
        let applier = TokenApplier::new(target.clone());
        (ThemeController::new(source, fonts, applier), target)
    }

    #[tokio::test]
    async fn test_initial_load_reaches_ready() {
        let (controller, target) = controller(Arc::new(ScriptedSource::new(vercel())));
        controller.load().await;

        let state = controller.state().await;
        assert_eq!(state.status, ResolutionStatus::Ready);
        assert!(state.fonts_ready);
        assert!(state.error_message.is_none());
        assert_eq!(state.current.unwrap().name, "vercel");

        let css = target.inner.stylesheet();
        let (light, dark) = css.split_once("\n\n").unwrap();
        assert!(light.contains("background: #fff;"));
        assert!(dark.contains("background: #000;"));
        assert!(controller.loaded_fonts().await.contains("Inter"));
    }

    #[tokio::test]
    async fn test_source_failure_falls_back() {
        let source = Arc::new(ScriptedSource::new(vercel()));
        source.fail_fetch.store(true, Ordering::SeqCst);

        let (controller, target) = controller(source);
        controller.load().await;

        let state = controller.state().await;
        assert_eq!(state.status, ResolutionStatus::Fallback);
        assert_eq!(state.current.unwrap().name, FALLBACK_THEME_NAME);
        assert!(state.error_message.is_some());

        // the ui is never left unstyled
        assert_eq!(target.writes.load(Ordering::SeqCst), 1);
        assert!(target.inner.stylesheet().contains("background"));
    }

    #[tokio::test]
    async fn test_switch_then_revert_keeps_previous_theme() {
        let source = Arc::new(ScriptedSource::new(vercel()));
        let (controller, target) = controller(source.clone());

        controller.load().await;
        source.fail_set.store(true, Ordering::SeqCst);
        controller.switch_theme("ocean").await;

        let state = controller.state().await;
        assert_eq!(state.status, ResolutionStatus::Ready);
        assert_eq!(state.current.unwrap().name, "vercel");
        assert!(state.error_message.is_some());

        // reverting does not re-apply
        assert_eq!(target.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_switch_with_nothing_published_falls_back() {
        let source = Arc::new(ScriptedSource::new(vercel()));
        source.fail_set.store(true, Ordering::SeqCst);

        let (controller, _target) = controller(source);
        controller.switch_theme("ocean").await;

        let state = controller.state().await;
        assert_eq!(state.status, ResolutionStatus::Fallback);
        assert_eq!(state.current.unwrap().name, FALLBACK_THEME_NAME);
        assert!(state.error_message.is_some());
    }

    #[tokio::test]
    async fn test_refresh_failure_reverts() {
        let source = Arc::new(ScriptedSource::new(vercel()));
        let (controller, _target) = controller(source.clone());

        controller.load().await;
        source.fail_fetch.store(true, Ordering::SeqCst);
        controller.refresh_theme().await;

        let state = controller.state().await;
        assert_eq!(state.status, ResolutionStatus::Ready);
        assert_eq!(state.current.unwrap().name, "vercel");
        assert!(state.error_message.is_some());
    }

    #[tokio::test]
    async fn test_switch_over_catalog_replaces_rules() {
        let source = Arc::new(CatalogSource::new("vercel"));
        let (controller, target) = controller(source);

        controller.load().await;
        assert!(target.inner.stylesheet().contains("oklch(0.1448 0 0)"));

        controller.switch_theme("ocean").await;

        let state = controller.state().await;
        assert_eq!(state.status, ResolutionStatus::Ready);
        assert_eq!(state.current.unwrap().name, "ocean");

        // exactly one new applier invocation, previous rules fully replaced
        assert_eq!(target.writes.load(Ordering::SeqCst), 2);
        let css = target.inner.stylesheet();
        assert!(!css.contains("oklch(0.1448 0 0)"));
        assert!(css.contains("oklch(0.2068 0.0324 250.1340)"));
    }

    #[tokio::test]
    async fn test_status_never_ready_before_fonts_settle() {
        /// loader gated on an external signal
        struct GatedLoader {
            /// released once the test has observed the loading state
            gate: Arc<Notify>,
        }

        #[async_trait]
        impl FontLoader for GatedLoader {
            async fn load(&self, _family: &str) -> Result<()> {
                self.gate.notified().await;
                Ok(())
            }
        }

        let gate = Arc::new(Notify::new());
        let target = Arc::new(CountingTarget::default());
        let fonts = FontResolver::new(Arc::new(GatedLoader { gate: gate.clone() }), None);
        let applier = TokenApplier::new(target.clone());
        let controller = Arc::new(ThemeController::new(
            Arc::new(ScriptedSource::new(vercel())),
            fonts,
            applier,
        ));

        let load = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load().await }
        });

        // while the font gate is closed the state must stay gated
        tokio::task::yield_now().await;
        let snapshot = controller.snapshot().await;
        assert!(snapshot.is_loading);
        assert!(!snapshot.fonts_ready);
        assert_ne!(controller.state().await.status, ResolutionStatus::Ready);
        assert_eq!(target.writes.load(Ordering::SeqCst), 0);

        gate.notify_one();
        load.await.unwrap();

        let state = controller.state().await;
        assert_eq!(state.status, ResolutionStatus::Ready);
        assert!(state.fonts_ready);
        assert_eq!(target.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_resolution_is_discarded() {
        /// source whose first fetch blocks until released
        struct SlowFirstFetch {
            /// themes returned in call order
            slow: ThemeDefinition,
            /// theme returned by later fetches
            fast: ThemeDefinition,
            /// number of fetches so far
            calls: AtomicUsize,
            /// released to let the first fetch finish
            gate: Arc<Notify>,
        }

        #[async_trait]
        impl ThemeSource for SlowFirstFetch {
            async fn fetch_current(&self) -> Result<ThemeDefinition> {
                if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    self.gate.notified().await;
                    return Ok(self.slow.clone());
                }
                Ok(self.fast.clone())
            }

            async fn set_current(&self, _name: &str) -> Result<()> {
                Ok(())
            }

            async fn list(&self) -> Result<Vec<String>> {
                Ok(vec![])
            }
        }

        let gate = Arc::new(Notify::new());
        let slow = normalize(&json!({
            "name": "slow",
            "css_vars": { "light": { "background": "#111" } }
        }))
        .unwrap();

        let source = Arc::new(SlowFirstFetch {
            slow,
            fast: vercel(),
            calls: AtomicUsize::new(0),
            gate: gate.clone(),
        });
        let (controller, target) = controller(source);
        let controller = Arc::new(controller);

        // first load stalls inside the source
        let stalled = tokio::spawn({
            let controller = controller.clone();
            async move { controller.load().await }
        });
        tokio::task::yield_now().await;

        // a newer switch resolves while the old attempt is in flight
        controller.switch_theme("vercel").await;
        assert_eq!(controller.state().await.current.unwrap().name, "vercel");

        // the stale attempt settles afterwards and must not overwrite
        gate.notify_one();
        stalled.await.unwrap();

        assert_eq!(controller.state().await.current.unwrap().name, "vercel");
        assert!(!target.inner.stylesheet().contains("#111"));
    }
}
