use crate::config::Overrides;
use crate::core::filter::SchoolQuery;
use crate::domain::model::LoanApplication;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "schooldekho", version)]
#[command(about = "Browse, filter and compare schools on SchoolDekho")]
pub struct CliConfig {
    #[arg(long, global = true, env = "SCHOOLDEKHO_BACKEND_URL", help = "Backend base URL")]
    pub api_endpoint: Option<String>,

    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Directory with alumni/scholarship/campaign JSON overrides")]
    pub fixtures_dir: Option<String>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_endpoint: self.api_endpoint.clone(),
            timeout_seconds: self.timeout_seconds,
            fixtures_path: self.fixtures_dir.clone(),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List schools matching the filters
    Schools(SchoolArgs),
    /// Show one school
    Show { id: String },
    /// Compare two or three schools side by side
    Compare {
        #[arg(required = true, num_args = 2..=3)]
        ids: Vec<String>,
        #[arg(short, long, help = "Write the table to a .csv or .json file")]
        output: Option<String>,
    },
    /// Available school types, boards and cities
    Options,
    /// Check the backend health endpoint
    Health,
    /// Browse alumni mentors
    Alumni {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        school: Option<String>,
        #[arg(long)]
        year: Option<String>,
    },
    /// Browse scholarships
    Scholarships {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "all")]
        category: String,
        #[arg(long)]
        min_amount: Option<u64>,
    },
    /// Browse fundraising campaigns
    Campaigns {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Submit an education loan application
    ApplyLoan(LoanArgs),
    /// List loan applications of a user
    Loans { user_id: String },
}

/// 費用以字串接收，無法解析時視為未指定
#[derive(Debug, Clone, Default, Args)]
pub struct SchoolArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long = "type")]
    pub school_type: Option<String>,
    #[arg(long)]
    pub board: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub min_fee: Option<String>,
    #[arg(long)]
    pub max_fee: Option<String>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(short, long, help = "Write the list to a .csv or .json file")]
    pub output: Option<String>,
}

impl SchoolArgs {
    pub fn to_query(&self, default_limit: u32) -> SchoolQuery {
        let fields = [
            ("search", &self.search),
            ("school_type", &self.school_type),
            ("board", &self.board),
            ("city", &self.city),
            ("min_fee", &self.min_fee),
            ("max_fee", &self.max_fee),
        ];
        let mut query = SchoolQuery::from_params(
            fields
                .iter()
                .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v))),
        );
        query.limit = Some(self.limit.unwrap_or(default_limit));
        query.page = self.page;
        query
    }
}

#[derive(Debug, Clone, Args)]
pub struct LoanArgs {
    #[arg(long, default_value = "temp-user-id")]
    pub user_id: String,
    #[arg(long)]
    pub school_id: String,
    #[arg(long)]
    pub student_name: String,
    #[arg(long)]
    pub student_age: u32,
    #[arg(long = "class")]
    pub class_applying_for: String,
    #[arg(long)]
    pub loan_amount: u64,
    #[arg(long)]
    pub family_income: u64,
    #[arg(long, value_delimiter = ',')]
    pub documents: Vec<String>,
}

impl From<LoanArgs> for LoanApplication {
    fn from(args: LoanArgs) -> Self {
        LoanApplication {
            user_id: args.user_id,
            school_id: args.school_id,
            student_name: args.student_name,
            student_age: args.student_age,
            class_applying_for: args.class_applying_for,
            loan_amount: args.loan_amount,
            family_income: args.family_income,
            documents: args.documents,
        }
    }
}
