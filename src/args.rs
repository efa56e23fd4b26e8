use clap::{Parser, Subcommand};

/// A live scoring board for community dinners.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the event: teams, categories, vote file.
    /// The built-in event is used when not provided.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The CSV file holding the votes. Setting this option overrides the
    /// path that may be specified with the --config option.
    #[clap(long, value_parser)]
    pub votes: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Creates the vote file if it does not exist yet.
    Init,
    /// Lists the teams the voter still has to score.
    Status {
        /// The team that is voting.
        #[clap(long, value_parser)]
        voter: String,
    },
    /// Records the scores of one team for another team.
    Vote {
        /// The team that is voting.
        #[clap(long, value_parser)]
        voter: String,
        /// The team that receives the scores.
        #[clap(long, value_parser)]
        evaluated: String,
        /// (CATEGORY=POINTS, repeatable) The points for one category. Categories that are not
        /// given take the default value.
        #[clap(short, long, value_parser)]
        score: Vec<String>,
    },
    /// Prints the current results.
    Results {
        /// (table, csv or json, default table) The output format.
        #[clap(long, value_parser)]
        format: Option<String>,
        /// (file path, 'stdout' or empty) Where to write the results. Defaults to stdout.
        #[clap(short, long, value_parser)]
        out: Option<String>,
        /// Adds bar charts to the table output.
        #[clap(long, takes_value = false)]
        charts: bool,
    },
    /// Prints the results again and again, reading the votes each time.
    Watch {
        /// (milliseconds) The refresh interval. Overrides the configuration.
        #[clap(long, value_parser)]
        interval_ms: Option<u64>,
        /// (optional) Stops after this number of refreshes.
        #[clap(long, value_parser)]
        rounds: Option<u64>,
        /// Adds bar charts to the output.
        #[clap(long, takes_value = false)]
        charts: bool,
    },
    /// Writes a copy of the vote file and/or the summary table as CSV.
    Export {
        /// (file path or 'stdout') Destination of the raw votes.
        #[clap(long, value_parser)]
        raw: Option<String>,
        /// (file path or 'stdout') Destination of the summary table.
        #[clap(long, value_parser)]
        summary: Option<String>,
    },
}
