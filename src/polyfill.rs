use crate::config::Config;
use crate::debounce::Debouncer;
use crate::dom::{Document, NodeId};
use crate::media::MediaEnvironment;
use crate::metrics::Metrics;
use crate::resolver::Resolver;

/// Drives parse passes for a page: once when the document is ready and
/// again, debounced, whenever the viewport is resized.
#[derive(Debug)]
pub struct PicturePolyfill {
    config: Config,
    resolver: Resolver,
    resize: Debouncer,
    is_useful: bool,
    listeners_active: bool,
    ready: bool,
}

impl PicturePolyfill {
    /// Hosts with native `picture` support never need the polyfill
    pub fn new(config: Config, native_picture_support: bool) -> Self {
        Self {
            resolver: Resolver::new(&config.container_tag),
            resize: Debouncer::new(config.resize_delay_ms),
            config,
            is_useful: !native_picture_support,
            listeners_active: false,
            ready: false,
        }
    }

    pub fn is_useful(&self) -> bool {
        self.is_useful
    }

    pub fn metrics(&self) -> Metrics {
        self.resolver.metrics()
    }

    /// Start listening for ready and resize signals. Returns false when
    /// the listeners are already active or the polyfill is not needed.
    pub fn add_listeners(&mut self) -> bool {
        if !self.is_useful || self.listeners_active {
            return false;
        }
        self.listeners_active = true;
        true
    }

    /// Stop listening and drop any pending resize pass
    pub fn remove_listeners(&mut self) -> bool {
        if !self.listeners_active {
            return false;
        }
        self.listeners_active = false;
        if self.resize.cancel() {
            debug!("Cancelled the pending resize pass");
        }
        true
    }

    /// Parse every container under `root`. Returns the number processed.
    pub fn parse(
        &mut self,
        document: &mut Document,
        root: NodeId,
        env: &dyn MediaEnvironment,
        read_from_cache: bool,
    ) -> usize {
        if !self.is_useful {
            return 0;
        }
        self.resolver.parse(document, root, env, read_from_cache)
    }

    pub fn parse_document(&mut self, document: &mut Document, env: &dyn MediaEnvironment) -> usize {
        let root = document.root();
        let read_from_cache = self.config.read_from_cache;
        self.parse(document, root, env, read_from_cache)
    }

    /// The document finished loading. Only the first signal parses.
    pub fn on_ready(&mut self, document: &mut Document, env: &dyn MediaEnvironment) -> usize {
        if !self.listeners_active || self.ready {
            return 0;
        }
        self.ready = true;
        self.parse_document(document, env)
    }

    /// The viewport changed size. Returns when the re-parse is due.
    pub fn on_resize(&mut self, now_ms: u64) -> Option<u64> {
        if !self.listeners_active {
            return None;
        }
        Some(self.resize.trigger(now_ms))
    }

    /// Run the pending re-parse if it has come due
    pub fn on_tick(
        &mut self,
        document: &mut Document,
        env: &dyn MediaEnvironment,
        now_ms: u64,
    ) -> Option<usize> {
        if !self.resize.poll(now_ms) {
            return None;
        }
        debug!(
            "Resize settled at {}ms, parsing again (pass {})",
            now_ms,
            self.resize.fired()
        );
        Some(self.parse_document(document, env))
    }

    pub fn resize_pending(&self) -> Option<u64> {
        self.resize.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::load_document;
    use crate::media::Viewport;

    const PAGE: &str = r#"<picture data-default-src="default.png">
        <source media="(min-width: 800px)" src="wide.png">
        <source media="(max-width: 799px)" src="narrow.png">
        <img>
    </picture>
    <picture><source src="second.png"><img></picture>"#;

    fn src(document: &Document) -> Option<String> {
        let img = document
            .first_element_by_tag_name(document.root(), "img")
            .unwrap();
        document.get_attribute(img, "src").map(str::to_owned)
    }

    fn started(config: Config) -> PicturePolyfill {
        let mut polyfill = PicturePolyfill::new(config, false);
        assert!(polyfill.add_listeners());
        polyfill
    }

    #[test]
    fn test_ready_parses_once() {
        let mut document = load_document(PAGE);
        let mut polyfill = started(Config::default());
        let env = Viewport::default();

        assert_eq!(polyfill.on_ready(&mut document, &env), 2);
        assert_eq!(polyfill.on_ready(&mut document, &env), 0);
        assert_eq!(src(&document).as_deref(), Some("wide.png"));
        assert!(!polyfill.add_listeners());
    }

    #[test]
    fn test_resize_burst_parses_once_after_quiet_period() {
        let mut document = load_document(PAGE);
        let mut polyfill = started(Config::default());
        let wide = Viewport::default();
        polyfill.on_ready(&mut document, &wide);

        let narrow = wide.resized(500.0, 768.0);
        let mut passes = 0;
        for now in (0..=250).step_by(10) {
            // Resize signals keep arriving for the first 90ms of the drag
            if now < 100 {
                polyfill.on_resize(now);
            }
            if polyfill.on_tick(&mut document, &narrow, now).is_some() {
                passes += 1;
                assert_eq!(now, 190);
            }
        }

        assert_eq!(passes, 1);
        assert_eq!(src(&document).as_deref(), Some("narrow.png"));
        // Both containers came from the cache on the re-parse
        assert_eq!(polyfill.metrics().extracted, 2);
        assert_eq!(polyfill.metrics().cache_hits, 2);
    }

    #[test]
    fn test_configured_delay() {
        let mut document = load_document(PAGE);
        let mut polyfill = started(Config {
            resize_delay_ms: 50,
            ..Default::default()
        });
        let env = Viewport::default();

        assert_eq!(polyfill.on_resize(1000), Some(1050));
        assert_eq!(polyfill.resize_pending(), Some(1050));
        assert_eq!(polyfill.on_tick(&mut document, &env, 1049), None);
        assert_eq!(polyfill.on_tick(&mut document, &env, 1050), Some(2));
        assert_eq!(polyfill.resize_pending(), None);
    }

    #[test]
    fn test_remove_listeners_cancels_pending_resize() {
        let mut document = load_document(PAGE);
        let mut polyfill = started(Config::default());
        let env = Viewport::default();

        assert_eq!(polyfill.on_resize(0), Some(100));
        assert!(polyfill.remove_listeners());
        assert!(!polyfill.remove_listeners());
        assert_eq!(polyfill.resize_pending(), None);
        assert_eq!(polyfill.on_tick(&mut document, &env, 100), None);
        assert_eq!(polyfill.on_resize(200), None);

        // Listening again works as before
        assert!(polyfill.add_listeners());
        assert_eq!(polyfill.on_resize(300), Some(400));
    }

    #[test]
    fn test_native_support_disables_everything() {
        let mut document = load_document(PAGE);
        let mut polyfill = PicturePolyfill::new(Config::default(), true);
        let env = Viewport::default();

        assert!(!polyfill.is_useful());
        assert!(!polyfill.add_listeners());
        assert_eq!(polyfill.on_ready(&mut document, &env), 0);
        assert_eq!(polyfill.on_resize(0), None);
        assert_eq!(polyfill.parse_document(&mut document, &env), 0);
        assert_eq!(src(&document), None);
    }

    #[test]
    fn test_signals_ignored_before_listeners() {
        let mut document = load_document(PAGE);
        let mut polyfill = PicturePolyfill::new(Config::default(), false);
        let env = Viewport::default();

        assert_eq!(polyfill.on_resize(0), None);
        assert_eq!(polyfill.on_ready(&mut document, &env), 0);
        // Explicit parses still work
        assert_eq!(polyfill.parse_document(&mut document, &env), 2);
    }
}
