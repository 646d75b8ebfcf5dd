//! CLI binary for the ORCID client.
//!
//! Usage: orcid profile 0000-0002-1825-0097

#[cfg(feature = "cli")]
mod cli {
    use clap::{Parser, Subcommand};
    use orcid_client::{Author, OrcidClient, SchemaVersion};

    #[derive(Parser)]
    #[command(name = "orcid", about = "ORCID public API client", version)]
    struct Cli {
        /// API root (overrides ORCID_BASE_URL)
        #[arg(long, global = true)]
        base_url: Option<String>,

        /// Message version, 1.1 or 1.2 (overrides ORCID_API_VERSION)
        #[arg(long, global = true)]
        api_version: Option<String>,

        /// Output format
        #[arg(long, global = true, default_value = "table")]
        output: OutputFormat,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Clone, Copy, clap::ValueEnum)]
    enum OutputFormat {
        Table,
        Json,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Show an author's profile
        Profile {
            /// ORCID iD
            orcid: String,
        },
        /// List an author's works
        Works {
            /// ORCID iD
            orcid: String,
        },
        /// Search ORCID biographies
        Search {
            /// Search query (Solr syntax)
            query: String,
        },
    }

    fn make_client(cli: &Cli) -> orcid_client::error::Result<OrcidClient> {
        let mut client = OrcidClient::from_env()?;
        if let Some(version) = &cli.api_version {
            client = client.with_schema_version(version.parse::<SchemaVersion>()?);
        }
        if let Some(url) = &cli.base_url {
            client = client.with_base_url(url.clone());
        }
        Ok(client)
    }

    fn print_authors_table(authors: &[Author]) -> orcid_client::error::Result<()> {
        use comfy_table::{ContentArrangement, Table};

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ORCID", "Name", "Keywords"]);

        for author in authors {
            table.add_row(vec![
                author.orcid()?.unwrap_or("-").to_string(),
                author.full_name()?,
                author.keywords()?.join(", "),
            ]);
        }

        println!("{table}");
        Ok(())
    }

    pub async fn run() -> orcid_client::error::Result<()> {
        let cli = Cli::parse();
        let client = make_client(&cli)?;

        match &cli.command {
            Commands::Profile { orcid } => {
                let author = client.author(orcid).await?;
                let profile = author.profile()?;
                match cli.output {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&profile)?),
                    OutputFormat::Table => {
                        use comfy_table::{ContentArrangement, Table};

                        let mut table = Table::new();
                        table.set_content_arrangement(ContentArrangement::Dynamic);
                        table.add_row(vec!["Name".to_string(), profile.full_name.clone()]);
                        table.add_row(vec![
                            "ORCID".to_string(),
                            profile.orcid.clone().unwrap_or_default(),
                        ]);
                        table.add_row(vec![
                            "Biography".to_string(),
                            profile.bio.clone().unwrap_or_default(),
                        ]);
                        table.add_row(vec!["Keywords".to_string(), profile.keywords.join(", ")]);
                        for id in &profile.identifiers {
                            table.add_row(vec![id.label.clone(), id.id.clone()]);
                        }
                        for site in &profile.websites {
                            table.add_row(vec![
                                site.label.clone().unwrap_or_else(|| "Website".to_string()),
                                site.url.clone().unwrap_or_default(),
                            ]);
                        }
                        println!("{table}");
                    }
                }
            }

            Commands::Works { orcid } => {
                let works = client.works(orcid).await?;
                let publications = works.publications()?;
                match cli.output {
                    OutputFormat::Json => {
                        let rows = publications
                            .iter()
                            .map(|p| -> orcid_client::error::Result<serde_json::Value> {
                                Ok(serde_json::json!({
                                    "title": p.title()?,
                                    "type": p.work_type()?,
                                    "date": p.publication_date()?.map(|d| d.to_string()),
                                    "url": p.url()?,
                                }))
                            })
                            .collect::<orcid_client::error::Result<Vec<_>>>()?;
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    }
                    OutputFormat::Table => {
                        use comfy_table::{ContentArrangement, Table};

                        let mut table = Table::new();
                        table.set_content_arrangement(ContentArrangement::Dynamic);
                        table.set_header(vec!["Date", "Type", "Title"]);
                        for p in publications {
                            table.add_row(vec![
                                p.publication_date()?.map(|d| d.to_string()).unwrap_or_default(),
                                p.work_type()?.unwrap_or("").to_string(),
                                p.to_string(),
                            ]);
                        }
                        println!("{table}");
                    }
                }
            }

            Commands::Search { query } => {
                let results = client.search(query).await?;
                let authors = results.authors()?;
                match cli.output {
                    OutputFormat::Json => {
                        let profiles = authors
                            .iter()
                            .map(Author::profile)
                            .collect::<orcid_client::error::Result<Vec<_>>>()?;
                        println!("{}", serde_json::to_string_pretty(&profiles)?);
                    }
                    OutputFormat::Table => {
                        println!("Found {} results:", results.num_found()?.unwrap_or(0));
                        print_authors_table(authors)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with: cargo build --features cli");
    std::process::exit(1);
}
