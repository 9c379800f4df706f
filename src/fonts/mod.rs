//! font resolution stuff
pub mod loader;

use {
    crate::{
        error::{Result, ThemeError},
        theme::definition::TokenMap,
    },
    futures::future::join_all,
    hashbrown::HashSet,
    std::{sync::Arc, time::Duration},
    tokio::sync::RwLock,
    tracing::{debug, warn},
};

pub use loader::{FontLoader, HttpFontLoader, NoopFontLoader};

/// css generic family keywords that never need a webfont load
const GENERIC_FAMILIES: &[&str] = &[
    "sans-serif",
    "serif",
    "monospace",
    "system-ui",
    "cursive",
    "fantasy",
    "math",
    "emoji",
    "ui-sans-serif",
    "ui-serif",
    "ui-monospace",
    "ui-rounded",
];

/// token names that start with `font-` but do not carry a family stack
const NON_FAMILY_TOKENS: &[&str] = &["font-size", "font-weight", "font-style", "font-stretch"];

/// tracks which font families have settled this session and signals
/// readiness once every triggered load has settled, successfully or not
///
/// a failed load never blocks readiness; text falls back to the family's
/// css fallback stack and the failure is recorded
pub struct FontResolver {
    /// the platform font loading facility
    loader: Arc<dyn FontLoader>,

    /// families that loaded successfully this session
    loaded: RwLock<HashSet<String>>,

    /// families whose load failed this session
    failed: RwLock<HashSet<String>>,

    /// optional bound on a single family load
    timeout: Option<Duration>,
}

impl FontResolver {
    /// make a resolver over the given loader
    pub fn new(loader: Arc<dyn FontLoader>, timeout: Option<Duration>) -> Self {
        Self {
            loader,
            loaded: RwLock::new(HashSet::new()),
            failed: RwLock::new(HashSet::new()),
            timeout,
        }
    }

    /// resolve every distinct font family the token group references and
    /// wait for all triggered loads to settle
    ///
    /// idempotent: families that already settled this session are not
    /// re-triggered, so a theme switch only loads the delta
    pub async fn resolve(&self, tokens: &TokenMap) {
        let wanted = font_families(tokens);

        let pending: Vec<String> = {
            let loaded = self.loaded.read().await;
            let failed = self.failed.read().await;
            wanted
                .into_iter()
                .filter(|family| !loaded.contains(family) && !failed.contains(family))
                .collect()
        };

        if pending.is_empty() {
            return;
        }

        debug!(count = pending.len(), "loading font families");
        let settled = join_all(pending.iter().map(|family| self.load_one(family))).await;

        for (family, outcome) in pending.into_iter().zip(settled) {
            match outcome {
                Ok(()) => {
                    self.loaded.write().await.insert(family);
                }
                Err(e) => {
                    warn!(family = %family, error = %e, "font load failed, css fallback stack takes over");
                    self.failed.write().await.insert(family);
                }
            }
        }
    }

    /// load a single family, bounded by the optional timeout
    async fn load_one(&self, family: &str) -> Result<()> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.loader.load(family))
                .await
                .map_err(|_| ThemeError::FontLoadFailed {
                    family: family.to_string(),
                    reason: format!("timed out after {}s", timeout.as_secs()),
                })?,
            None => self.loader.load(family).await,
        }
    }

    /// families confirmed loaded this session
    pub async fn loaded_fonts(&self) -> HashSet<String> {
        self.loaded.read().await.clone()
    }

    /// families whose load failed this session
    pub async fn failed_fonts(&self) -> HashSet<String> {
        self.failed.read().await.clone()
    }
}

/// the distinct primary font families referenced by a token group
///
/// covers `font-sans`, `font-serif`, `font-mono` and any custom `font-*`
/// token that carries a family stack
pub fn font_families(tokens: &TokenMap) -> Vec<String> {
    let mut families: Vec<String> = Vec::new();

    for (name, value) in tokens {
        if !name.starts_with("font-") || NON_FAMILY_TOKENS.contains(&name.as_str()) {
            continue;
        }

        if let Some(family) = primary_family(value)
            && !families.contains(&family)
        {
            families.push(family);
        }
    }

    families.sort();
    families
}

/// the first family of a css font stack, unquoted
///
/// generic keywords yield none since the platform resolves those without
/// loading anything
fn primary_family(stack: &str) -> Option<String> {
    let first = stack.split(',').next()?.trim().trim_matches(['"', '\'']).trim();

    if first.is_empty() || GENERIC_FAMILIES.contains(&first.to_lowercase().as_str()) {
        return None;
    }

    Some(first.to_string())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        async_trait::async_trait,
        std::sync::atomic::{AtomicUsize, Ordering},
    };

    /// loader that counts calls and fails for configured families
    struct CountingLoader {
        /// how many loads were triggered
        calls: AtomicUsize,
        /// families that should fail to load
        failing: Vec<String>,
    }

    impl CountingLoader {
        fn new(failing: &[&str]) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                failing: failing.iter().map(|f| f.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl FontLoader for CountingLoader {
        async fn load(&self, family: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.failing.contains(&family.to_string()) {
                return Err(ThemeError::FontLoadFailed {
                    family: family.to_string(),
                    reason: "unavailable".to_string(),
                });
            }

            Ok(())
        }
    }

    /// a token group with the given font-sans stack
    fn tokens(sans: &str) -> TokenMap {
        TokenMap::from_iter([("font-sans".to_string(), sans.to_string())])
    }

    #[test]
    fn test_family_extraction() {
        let mut group = TokenMap::new();
        group.insert("font-sans".into(), "Inter, sans-serif".into());
        group.insert("font-serif".into(), "\"Source Serif 4\", serif".into());
        group.insert("font-mono".into(), "monospace".into());
        group.insert("font-size".into(), "16px".into());
        group.insert("radius".into(), "0.5rem".into());

        assert_eq!(font_families(&group), vec!["Inter", "Source Serif 4"]);
    }

    #[test]
    fn test_generic_families_are_skipped() {
        assert!(font_families(&tokens("system-ui, sans-serif")).is_empty());
        assert!(font_families(&tokens("ui-monospace, monospace")).is_empty());
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let loader = Arc::new(CountingLoader::new(&[]));
        let resolver = FontResolver::new(loader.clone(), None);
        let group = tokens("Inter, sans-serif");

        resolver.resolve(&group).await;
        resolver.resolve(&group).await;

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert!(resolver.loaded_fonts().await.contains("Inter"));
    }

    #[tokio::test]
    async fn test_switch_loads_only_the_delta() {
        let loader = Arc::new(CountingLoader::new(&[]));
        let resolver = FontResolver::new(loader.clone(), None);

        resolver.resolve(&tokens("Inter, sans-serif")).await;

        let mut next = tokens("Inter, sans-serif");
        next.insert("font-mono".into(), "JetBrains Mono, monospace".into());
        resolver.resolve(&next).await;

        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_loads_settle_without_blocking() {
        let loader = Arc::new(CountingLoader::new(&["Geist"]));
        let resolver = FontResolver::new(loader.clone(), None);

        let mut group = tokens("Inter, sans-serif");
        group.insert("font-mono".into(), "Geist, monospace".into());
        resolver.resolve(&group).await;

        assert!(resolver.loaded_fonts().await.contains("Inter"));
        assert!(resolver.failed_fonts().await.contains("Geist"));

        // a failed family is settled, not retried
        resolver.resolve(&group).await;
        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_loads_hit_the_timeout() {
        /// loader that never settles on its own
        struct StuckLoader;

        #[async_trait]
        impl FontLoader for StuckLoader {
            async fn load(&self, _family: &str) -> Result<()> {
                futures::future::pending().await
            }
        }

        let resolver =
            FontResolver::new(Arc::new(StuckLoader), Some(Duration::from_millis(10)));
        resolver.resolve(&tokens("Inter, sans-serif")).await;

        assert!(resolver.failed_fonts().await.contains("Inter"));
    }
}
