use clap::{Parser, Subcommand, ValueEnum};
use formdomain_kernel::Bias;

#[derive(Parser)]
#[command(
    name = "formdomain",
    about = "Formdomain: evaluate, invert and normalize record filter domains",
    version
)]
pub struct Cli {
    /// Log kernel decisions to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BiasArg {
    And,
    Or,
}

impl From<BiasArg> for Bias {
    fn from(arg: BiasArg) -> Self {
        match arg {
            BiasArg::And => Bias::And,
            BiasArg::Or => Bias::Or,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a domain and report its shape and variables
    Parse {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a domain against a complete context
    Eval {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Path to the context JSON object
        #[arg(long)]
        context: String,

        /// Bias for a top-level leaf
        #[arg(long, value_enum, default_value = "and")]
        bias: BiasArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the residual constraint on one field
    Invert {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Field to solve for
        #[arg(long)]
        symbol: String,

        /// Path to the context JSON object (defaults to an empty context)
        #[arg(long)]
        context: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Strip redundant singleton wrappers
    Simplify {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Flatten nested same-kind junctions
    Merge {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Combine several domains into one
    Concat {
        /// Path to a domain JSON (repeatable)
        #[arg(long = "domain", required = true)]
        domains: Vec<String>,

        /// Combine with OR instead of AND
        #[arg(long)]
        or: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite leaves rooted at a relation field into its own view
    Localize {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Relation field name
        #[arg(long)]
        field: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Prefix every leaf with a relation field name
    Unlocalize {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Relation field name
        #[arg(long)]
        field: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report the literal a `field = value` domain pins its field to
    UniqueValue {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List target models referenced by leaves on a field
    ReferenceModels {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Reference field name
        #[arg(long)]
        field: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rewrite leaves on a reference field to carry their target model
    PrepareReference {
        /// Path to the domain JSON
        #[arg(long)]
        domain: String,

        /// Reference field name
        #[arg(long)]
        field: String,

        /// Keep only leaves targeting this model
        #[arg(long)]
        model: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
