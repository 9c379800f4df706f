//! the core app
use {
    super::{cli::Cli, logging},
    crate::{
        apply::{DocumentStyle, TokenApplier},
        fonts::{FontLoader, FontResolver, HttpFontLoader, NoopFontLoader},
        getopt,
        resolve::ThemeController,
        source::source_from_config,
    },
    color_eyre::{Report, eyre::Result},
    owo_colors::OwoColorize,
    std::{sync::Arc, time::Duration},
    tracing::{info, warn},
};

/// the themeloom app
pub struct ThemeApp {
    /// the resolution controller
    controller: Arc<ThemeController>,

    /// the style target the controller writes into
    style: Arc<DocumentStyle>,

    /// parsed cli flags
    argv: Cli,
}

impl ThemeApp {
    /// initialize themeloom
    ///
    /// - 1. installs the miette error handler hook
    /// - 2. handles any cli arguments if any
    /// - 3. sets up logging
    /// - 4. builds the configured theme source and font loader
    /// - 5. wires up the resolution controller
    ///
    /// # Errors
    ///
    /// returns an error if the miette hook fails to install  
    /// returns an error if the cli fails to run  
    /// returns an error if it fails to setup logging  
    /// returns an error if the configured source or font loader cannot be built
    pub async fn init() -> Result<Self> {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::MietteHandlerOpts::new()
                    .terminal_links(true)
                    .unicode(true)
                    .context_lines(3)
                    .tab_width(4)
                    .build(),
            )
        }))
        .map_err(|e| color_eyre::eyre::eyre!("failed to install miette hook: {e}"))?;

        let argv = Cli::run()?;

        if getopt!(logging.enable) {
            logging::setup()?;
        }

        let source = source_from_config().map_err(Report::new)?;

        let loader: Arc<dyn FontLoader> = if getopt!(fonts.enable) {
            Arc::new(HttpFontLoader::from_config().map_err(Report::new)?)
        } else {
            Arc::new(NoopFontLoader)
        };

        let timeout = match getopt!(fonts.timeout_secs) {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        let style = Arc::new(DocumentStyle::new());
        let controller = ThemeController::new(
            source,
            FontResolver::new(loader, timeout),
            TokenApplier::new(style.clone()),
        );

        info!(
            "Starting {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );

        Ok(Self {
            controller: Arc::new(controller),
            style,
            argv,
        })
    }

    /// run the selected action
    ///
    /// # Errors
    ///
    /// returns an error if listing themes fails
    pub async fn run(&self) -> Result<()> {
        if self.argv.list {
            return self.list_themes().await;
        }

        if let Some(name) = &self.argv.switch {
            self.controller.switch_theme(name).await;
        } else if self.argv.refresh {
            self.controller.refresh_theme().await;
        } else {
            self.controller.load().await;
        }

        self.print_resolution().await;
        Ok(())
    }

    /// list the selectable themes
    async fn list_themes(&self) -> Result<()> {
        let names = self.controller.list_themes().await.map_err(Report::new)?;

        for name in names {
            println!("{}", name.cyan());
        }

        Ok(())
    }

    /// print the resolved theme and its injected css
    async fn print_resolution(&self) {
        let snapshot = self.controller.snapshot().await;

        if let Some(error) = &snapshot.error {
            warn!("{error}");
        }

        if let Some(theme) = &snapshot.theme {
            println!("/* {} ({}) */", theme.display_name.bold(), theme.name);
        }

        println!("{}", self.style.stylesheet());
    }
}
