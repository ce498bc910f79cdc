use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use super::{ApiError, ListOrCsv};
use crate::core::{
    CityCostProfile, Lifestyle, ReadinessWeights, ScenarioConfig, ScenarioInputs, ScenarioResult,
    StressFactors, VerdictBands, evaluate, find_city, reference_cities,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CliLifestyle {
    #[serde(alias = "Basic")]
    Basic,
    #[serde(alias = "Standard")]
    Standard,
    #[serde(alias = "Comfortable")]
    Comfortable,
}

impl From<CliLifestyle> for Lifestyle {
    fn from(value: CliLifestyle) -> Self {
        match value {
            CliLifestyle::Basic => Lifestyle::Basic,
            CliLifestyle::Standard => Lifestyle::Standard,
            CliLifestyle::Comfortable => Lifestyle::Comfortable,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "waymark evaluate",
    about = "Relocation budget estimator (monthly cost, tax, runway, stress tests, cheaper cities)"
)]
pub struct ScenarioCli {
    #[arg(long, help = "City from the built-in cost table, e.g. Lisbon")]
    pub city: String,
    #[arg(long, help = "Monthly income before tax")]
    pub income: f64,
    #[arg(long, default_value_t = 0.0, help = "Savings available to cover deficits")]
    pub savings: f64,
    #[arg(long, value_enum, default_value_t = CliLifestyle::Standard)]
    pub lifestyle: CliLifestyle,
    #[arg(
        long = "extra-multiplier",
        help = "Additional housing/family cost multiplier; may be repeated"
    )]
    pub extra_multipliers: Vec<f64>,
    #[arg(long, help = "Maximum number of cheaper cities to list")]
    pub alternatives: Option<usize>,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Net surplus above required outlay for a sustainable verdict, in percent"
    )]
    pub sustainable_margin: f64,
    #[arg(
        long,
        default_value_t = 10.0,
        help = "Deficit below required outlay still rated tight, in percent"
    )]
    pub tight_margin: f64,
    #[arg(
        long,
        default_value_t = 20.0,
        help = "Income drop applied by the stress test, in percent"
    )]
    pub income_shock: f64,
    #[arg(
        long,
        default_value_t = 15.0,
        help = "Rent increase applied by the stress test, in percent"
    )]
    pub rent_shock: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ScenarioPayload {
    city: Option<String>,
    income: Option<f64>,
    savings: Option<f64>,
    lifestyle: Option<CliLifestyle>,
    extra_multipliers: Option<ListOrCsv<f64>>,
    alternative_limit: Option<usize>,
    sustainable_margin: Option<f64>,
    tight_margin: Option<f64>,
    income_shock: Option<f64>,
    rent_shock: Option<f64>,
}

#[derive(Debug)]
pub(crate) struct ScenarioRequest {
    pub city: CityCostProfile,
    pub lifestyle: Lifestyle,
    pub inputs: ScenarioInputs,
    pub config: ScenarioConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScenarioResponse {
    pub lifestyle: Lifestyle,
    pub verdict_label: &'static str,
    #[serde(flatten)]
    pub result: ScenarioResult,
}

pub(crate) fn build_scenario_request(
    cli: ScenarioCli,
    cities: &[CityCostProfile],
) -> Result<ScenarioRequest, ApiError> {
    if !cli.income.is_finite() || cli.income < 0.0 {
        return Err(ApiError::invalid("--income must be >= 0"));
    }

    if !cli.savings.is_finite() || cli.savings < 0.0 {
        return Err(ApiError::invalid("--savings must be >= 0"));
    }

    if cli
        .extra_multipliers
        .iter()
        .any(|m| !m.is_finite() || *m <= 0.0)
    {
        return Err(ApiError::invalid("--extra-multiplier values must be > 0"));
    }

    for (name, value) in [
        ("--sustainable-margin", cli.sustainable_margin),
        ("--tight-margin", cli.tight_margin),
        ("--income-shock", cli.income_shock),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(ApiError::invalid(format!(
                "{name} must be between 0 and 100"
            )));
        }
    }

    if !cli.rent_shock.is_finite() || cli.rent_shock < 0.0 {
        return Err(ApiError::invalid("--rent-shock must be >= 0"));
    }

    let city = find_city(cities, &cli.city)
        .cloned()
        .ok_or_else(|| ApiError::UnknownCity(cli.city.clone()))?;
    let lifestyle: Lifestyle = cli.lifestyle.into();

    Ok(ScenarioRequest {
        city,
        lifestyle,
        inputs: ScenarioInputs {
            income: cli.income,
            savings: cli.savings,
            lifestyle_multiplier: lifestyle.multiplier(),
            extra_multipliers: cli.extra_multipliers,
            alternative_limit: cli.alternatives,
        },
        config: ScenarioConfig {
            verdict_bands: VerdictBands {
                sustainable_margin: cli.sustainable_margin / 100.0,
                tight_margin: cli.tight_margin / 100.0,
            },
            stress: StressFactors {
                income_shock: 1.0 - cli.income_shock / 100.0,
                rent_shock: 1.0 + cli.rent_shock / 100.0,
            },
            readiness: ReadinessWeights::default(),
        },
    })
}

pub(crate) fn scenario_request_from_payload(
    payload: ScenarioPayload,
    cities: &[CityCostProfile],
) -> Result<ScenarioRequest, ApiError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.city {
        cli.city = v;
    }
    if let Some(v) = payload.income {
        cli.income = v;
    }
    if let Some(v) = payload.savings {
        cli.savings = v;
    }
    if let Some(v) = payload.lifestyle {
        cli.lifestyle = v;
    }
    if let Some(v) = payload.extra_multipliers {
        cli.extra_multipliers = v.into_vec()?;
    }
    if let Some(v) = payload.alternative_limit {
        cli.alternatives = Some(v);
    }
    if let Some(v) = payload.sustainable_margin {
        cli.sustainable_margin = v;
    }
    if let Some(v) = payload.tight_margin {
        cli.tight_margin = v;
    }
    if let Some(v) = payload.income_shock {
        cli.income_shock = v;
    }
    if let Some(v) = payload.rent_shock {
        cli.rent_shock = v;
    }

    build_scenario_request(cli, cities)
}

pub(crate) fn build_scenario_response(
    request: &ScenarioRequest,
    cities: &[CityCostProfile],
) -> ScenarioResponse {
    let result = evaluate(&request.city, cities, &request.inputs, &request.config);
    ScenarioResponse {
        lifestyle: request.lifestyle,
        verdict_label: result.verdict.label(),
        result,
    }
}

pub fn evaluate_cli(cli: ScenarioCli) -> Result<String, ApiError> {
    let cities = reference_cities();
    let request = build_scenario_request(cli, &cities)?;
    let response = build_scenario_response(&request, &cities);
    Ok(serde_json::to_string_pretty(&response)?)
}

fn default_cli_for_api() -> ScenarioCli {
    ScenarioCli {
        city: "Lisbon".to_string(),
        income: 3_000.0,
        savings: 10_000.0,
        lifestyle: CliLifestyle::Standard,
        extra_multipliers: Vec::new(),
        alternatives: Some(2),
        sustainable_margin: 10.0,
        tight_margin: 10.0,
        income_shock: 20.0,
        rent_shock: 15.0,
    }
}
