//! cli stuff
use {
    crate::config::options::Themeloom,
    clap::Parser,
    color_eyre::{Report, eyre::Result},
    schemars::generate::SchemaSettings,
    std::{
        fs::OpenOptions,
        io::{BufWriter, Write},
    },
};

/// the CLI
#[derive(Parser)]
#[command(name = "themeloom", version, about = "resolve a theme and print its injected css")]
pub struct Cli {
    /// Save generated files instead of printing
    #[arg(long)]
    pub save: bool,

    /// Generate a JSON schemafile based on the defaults
    #[arg(short = 's', long)]
    pub gen_schema: bool,

    /// Generate the default config file
    #[arg(short = 'd', long)]
    pub gen_default: bool,

    /// Generate both the schema and the default config file
    #[arg(short = 'a', long)]
    pub gen_all: bool,

    /// List the available themes instead of resolving one
    #[arg(short, long)]
    pub list: bool,

    /// Switch to the named theme instead of resolving the current one
    #[arg(long)]
    pub switch: Option<String>,

    /// Re-fetch the active theme, picking up out-of-band edits
    #[arg(short, long)]
    pub refresh: bool,
}

impl Cli {
    /// parse the CLI and handle the generator flags
    ///
    /// # Errors
    ///
    /// returns an error if it fails to generate and/or save the json schema  
    /// returns an error if it fails to generate and/or save the default config  
    pub fn run() -> Result<Self> {
        let argv = Self::parse();

        if argv.gen_schema || argv.gen_all {
            Self::gen_schema(argv.save)?;
        }

        if argv.gen_default || argv.gen_all {
            Self::gen_defaults(argv.save)?;
        }

        if argv.gen_default || argv.gen_all || argv.gen_schema {
            std::process::exit(0);
        }

        Ok(argv)
    }

    /// save a string to a file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to open `path`
    pub fn write_to_file(path: &str, contents: &str) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;
        let mut w = BufWriter::new(file);
        w.write_all(contents.as_bytes()).map_err(Report::new)
    }

    /// generate/save the config schema
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the schema to a JSON string  
    /// returns an error if it fails to save the schema to `resources/themeloom.schema.json`
    pub fn gen_schema(save: bool) -> Result<()> {
        let settings = SchemaSettings::draft2020_12().for_serialize();
        let generator = settings.into_generator();
        let schema = generator.into_root_schema_for::<Themeloom>();
        let schema_str = serde_json::to_string_pretty(&schema)?;

        if save {
            Self::write_to_file("resources/themeloom.schema.json", &schema_str)?;
        } else {
            println!("{}", schema_str);
        }

        Ok(())
    }

    /// generate/save the default config file
    ///
    /// # Errors
    ///
    /// returns an error if it fails to convert the default config to TOML
    /// returns an error if it fails to save the default config to `resources/themeloom.default.toml`
    pub fn gen_defaults(save: bool) -> Result<()> {
        let toml_str = toml::to_string_pretty(&Themeloom::default())?;

        if save {
            Self::write_to_file("resources/themeloom.default.toml", &toml_str)?;
        } else {
            println!("{}", toml_str);
        }

        Ok(())
    }
}
