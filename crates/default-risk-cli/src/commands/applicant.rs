use clap::Args;
use serde_json::Value;

use default_risk_core::applicant::{
    ApplicantInput, CategoryTable, FormSubmission, ParsedApplicant,
};
use default_risk_core::config::RiskConfig;
use default_risk_core::features::calculate_features;

use crate::input;

/// Applicant attributes, from a file, piped JSON, or individual flags.
///
/// Flag values are parsed leniently: anything missing or unparseable becomes
/// 0 and is reported in the output warnings.
#[derive(Args)]
pub struct ApplicantArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Treat --input / piped JSON as raw form values instead of a typed record
    #[arg(long)]
    pub form: bool,

    /// Employment type label or code
    #[arg(long)]
    pub employment_type: Option<String>,

    /// Years with the current employer
    #[arg(long)]
    pub current_employment_years: Option<String>,

    /// Total years in employment
    #[arg(long)]
    pub total_employment_years: Option<String>,

    /// Existing SBI customer (yes/no)
    #[arg(long, alias = "sbi")]
    pub sbi_customer: Option<String>,

    /// Location type label or code
    #[arg(long)]
    pub location_type: Option<String>,

    /// Number of dependants
    #[arg(long)]
    pub dependants: Option<String>,

    /// Annual income
    #[arg(long, allow_hyphen_values = true)]
    pub income: Option<String>,

    /// Annual installments on other loans
    #[arg(long, alias = "amis", allow_hyphen_values = true)]
    pub other_amis: Option<String>,

    /// Requested loan amount per year
    #[arg(long, allow_hyphen_values = true)]
    pub loan_amount: Option<String>,

    /// Loan tenure in years
    #[arg(long, alias = "tenure")]
    pub loan_tenure: Option<String>,

    /// CIBIL ranking bucket (1-10)
    #[arg(long)]
    pub cibil_rank: Option<String>,

    /// CIBIL score (300-900)
    #[arg(long)]
    pub cibil_score: Option<String>,

    /// Current days past due
    #[arg(long)]
    pub dpd: Option<String>,

    /// Worst days past due
    #[arg(long)]
    pub max_dpd: Option<String>,

    /// Installments missed so far
    #[arg(long)]
    pub missed_emis: Option<String>,
}

impl ApplicantArgs {
    fn to_form(&self) -> FormSubmission {
        let flags = [
            ("employment_type", &self.employment_type),
            ("current_employment_years", &self.current_employment_years),
            ("total_employment_years", &self.total_employment_years),
            ("sbi_customer", &self.sbi_customer),
            ("location_type", &self.location_type),
            ("dependants", &self.dependants),
            ("income", &self.income),
            ("other_amis", &self.other_amis),
            ("loan_amount", &self.loan_amount),
            ("loan_tenure", &self.loan_tenure),
            ("cibil_rank", &self.cibil_rank),
            ("cibil_score", &self.cibil_score),
            ("dpd", &self.dpd),
            ("max_dpd", &self.max_dpd),
            ("missed_emis", &self.missed_emis),
        ];

        let mut form = FormSubmission::new();
        for (field, value) in flags {
            if let Some(v) = value {
                form.insert(field, v.clone());
            }
        }
        form
    }
}

/// Arguments for the derived-feature calculation
#[derive(Args)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub applicant: ApplicantArgs,

    /// Config file supplying category tables for form labels
    #[arg(long)]
    pub config: Option<String>,
}

/// Resolve the applicant from --input, piped stdin, or flags, in that order.
pub fn load_applicant(
    args: &ApplicantArgs,
    config: Option<&RiskConfig>,
) -> Result<ParsedApplicant, Box<dyn std::error::Error>> {
    let data = if let Some(ref path) = args.input {
        Some(input::file::read_json_value(path)?)
    } else {
        input::stdin::read_stdin()?
    };

    let form = match data {
        Some(value) if !args.form => {
            let applicant: ApplicantInput = serde_json::from_value(value)?;
            return Ok(ParsedApplicant {
                input: applicant,
                warnings: Vec::new(),
            });
        }
        Some(value) => serde_json::from_value::<FormSubmission>(value)?,
        None => {
            let form = args.to_form();
            if form.is_empty() {
                return Err("applicant flags are required (or provide --input)".into());
            }
            form
        }
    };

    let empty = CategoryTable::default();
    let parsed = match config {
        Some(c) => c.parse_form(&form),
        None => ApplicantInput::from_form(&form, &empty, &empty),
    };
    Ok(parsed)
}

pub fn run_features(args: FeaturesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config = match args.config {
        Some(ref path) => Some(input::config::read_config(path)?),
        None => None,
    };
    let parsed = load_applicant(&args.applicant, config.as_ref())?;

    let mut output = calculate_features(&parsed.input);
    let mut warnings = parsed.warnings;
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    Ok(serde_json::to_value(output)?)
}
