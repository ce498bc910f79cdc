use super::types::{
    AlternativeCity, CityCostProfile, ReadinessWeights, RiskLevel, Runway, ScenarioConfig,
    ScenarioInputs, ScenarioResult, StressKind, StressScenario, Verdict, VerdictBands,
};

pub fn evaluate(
    city: &CityCostProfile,
    reference: &[CityCostProfile],
    inputs: &ScenarioInputs,
    config: &ScenarioConfig,
) -> ScenarioResult {
    let multiplier = inputs.cost_multiplier();
    let base_cost = city.base_monthly_cost();
    let adjusted_cost = base_cost * multiplier;
    let tax = inputs.income * city.tax_rate;
    let required_outlay = adjusted_cost + tax;
    let net = inputs.income - adjusted_cost - tax;
    let runway = Runway::from_net(net, inputs.savings);
    let meets_income_threshold = inputs.income >= city.visa_income_requirement;

    let stress = StressKind::ALL
        .iter()
        .map(|&kind| stress_scenario(kind, city, inputs, adjusted_cost, config))
        .collect();

    let alternatives = cheaper_alternatives(city, reference, multiplier, inputs.alternative_limit);

    ScenarioResult {
        city: city.city.clone(),
        country: city.country.clone(),
        risk_level: city.risk_level,
        base_cost,
        adjusted_cost,
        tax,
        required_outlay,
        net,
        runway,
        meets_income_threshold,
        verdict: classify_verdict(net, required_outlay, config.verdict_bands),
        readiness_score: readiness_score(
            ReadinessFactors {
                net,
                required_outlay,
                adjusted_cost,
                savings: inputs.savings,
                meets_income_threshold,
                risk_level: city.risk_level,
            },
            config.readiness,
        ),
        stress,
        alternatives,
    }
}

pub fn classify_verdict(net: f64, required_outlay: f64, bands: VerdictBands) -> Verdict {
    if net > bands.sustainable_margin * required_outlay {
        Verdict::Sustainable
    } else if net >= -bands.tight_margin * required_outlay {
        Verdict::Tight
    } else {
        Verdict::NotRealistic
    }
}

/// Other cities in `reference` whose modeled cost is strictly below the
/// current city's, cheapest first.
pub fn cheaper_alternatives(
    current: &CityCostProfile,
    reference: &[CityCostProfile],
    cost_multiplier: f64,
    limit: Option<usize>,
) -> Vec<AlternativeCity> {
    let current_cost = current.base_monthly_cost() * cost_multiplier;

    let mut cheaper = reference
        .iter()
        .filter(|candidate| !candidate.is_same_city(current))
        .map(|candidate| {
            let adjusted_cost = candidate.base_monthly_cost() * cost_multiplier;
            AlternativeCity {
                city: candidate.city.clone(),
                country: candidate.country.clone(),
                adjusted_cost,
                monthly_savings: current_cost - adjusted_cost,
            }
        })
        .filter(|alt| alt.adjusted_cost < current_cost)
        .collect::<Vec<_>>();

    cheaper.sort_by(|a, b| a.adjusted_cost.total_cmp(&b.adjusted_cost));
    if let Some(limit) = limit {
        cheaper.truncate(limit);
    }
    cheaper
}

fn stress_scenario(
    kind: StressKind,
    city: &CityCostProfile,
    inputs: &ScenarioInputs,
    adjusted_cost: f64,
    config: &ScenarioConfig,
) -> StressScenario {
    let income = if kind.shocks_income() {
        inputs.income * config.stress.income_shock
    } else {
        inputs.income
    };
    let adjusted_cost = if kind.shocks_rent() {
        adjusted_cost + city.rent * (config.stress.rent_shock - 1.0)
    } else {
        adjusted_cost
    };
    let tax = income * city.tax_rate;
    let net = income - adjusted_cost - tax;

    StressScenario {
        kind,
        income,
        adjusted_cost,
        tax,
        net,
        runway: Runway::from_net(net, inputs.savings),
        verdict: classify_verdict(net, adjusted_cost + tax, config.verdict_bands),
    }
}

#[derive(Debug, Clone, Copy)]
struct ReadinessFactors {
    net: f64,
    required_outlay: f64,
    adjusted_cost: f64,
    savings: f64,
    meets_income_threshold: bool,
    risk_level: RiskLevel,
}

fn readiness_score(f: ReadinessFactors, weights: ReadinessWeights) -> u32 {
    // Margin points ramp from 0 at a -10% margin to full at +20%.
    let margin_ratio = if f.required_outlay > 0.0 {
        f.net / f.required_outlay
    } else if f.net >= 0.0 {
        1.0
    } else {
        -1.0
    };
    let margin_points = weights.margin * ((margin_ratio + 0.1) / 0.3).clamp(0.0, 1.0);

    let months_covered = if f.adjusted_cost > 0.0 {
        f.savings / f.adjusted_cost
    } else {
        weights.savings_target_months
    };
    let savings_points = if weights.savings_target_months > 0.0 {
        weights.savings * (months_covered / weights.savings_target_months).clamp(0.0, 1.0)
    } else {
        weights.savings
    };

    let threshold_points = if f.meets_income_threshold {
        weights.threshold
    } else {
        0.0
    };
    let risk_points = weights.risk
        * match f.risk_level {
            RiskLevel::Low => 1.0,
            RiskLevel::Medium => 0.5,
            RiskLevel::High => 0.0,
        };

    (margin_points + savings_points + threshold_points + risk_points)
        .round()
        .clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cities::reference_cities;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_city() -> CityCostProfile {
        CityCostProfile {
            city: "Berlin".to_string(),
            country: "Germany".to_string(),
            rent: 1350.0,
            food: 430.0,
            transport: 70.0,
            insurance: 160.0,
            coworking: None,
            tax_rate: 0.26,
            visa_income_requirement: 2800.0,
            risk_level: RiskLevel::Low,
        }
    }

    fn sample_inputs(income: f64) -> ScenarioInputs {
        ScenarioInputs {
            income,
            savings: 6000.0,
            lifestyle_multiplier: 1.0,
            extra_multipliers: Vec::new(),
            alternative_limit: None,
        }
    }

    fn stress_of(result: &ScenarioResult, kind: StressKind) -> &StressScenario {
        result
            .stress
            .iter()
            .find(|s| s.kind == kind)
            .expect("every stress kind is evaluated")
    }

    #[test]
    fn positive_net_has_stable_runway() {
        let city = sample_city();
        let result = evaluate(&city, &[], &sample_inputs(3000.0), &ScenarioConfig::default());

        assert_approx(result.base_cost, 2010.0);
        assert_approx(result.adjusted_cost, 2010.0);
        assert_approx(result.tax, 780.0);
        assert_approx(result.net, 210.0);
        assert_eq!(result.runway, Runway::Stable);
        assert!(result.meets_income_threshold);
    }

    #[test]
    fn negative_net_runway_divides_savings_by_deficit() {
        let city = sample_city();
        let result = evaluate(&city, &[], &sample_inputs(2000.0), &ScenarioConfig::default());

        assert_approx(result.net, -530.0);
        let months = result.runway.months().expect("deficit yields finite runway");
        assert!((months - 11.32).abs() < 0.01, "got {months}");
        assert!(!result.meets_income_threshold);
        assert_eq!(result.verdict, Verdict::NotRealistic);
    }

    #[test]
    fn zero_net_is_stable_not_a_division() {
        let mut city = sample_city();
        city.tax_rate = 0.0;
        let result = evaluate(&city, &[], &sample_inputs(2010.0), &ScenarioConfig::default());
        assert_approx(result.net, 0.0);
        assert_eq!(result.runway, Runway::Stable);
    }

    #[test]
    fn threshold_boundary_counts_as_pass() {
        let city = sample_city();
        let result = evaluate(&city, &[], &sample_inputs(2800.0), &ScenarioConfig::default());
        assert!(result.meets_income_threshold);
    }

    #[test]
    fn coworking_and_multipliers_feed_adjusted_cost() {
        let mut city = sample_city();
        city.coworking = Some(190.0);
        let mut inputs = sample_inputs(5000.0);
        inputs.lifestyle_multiplier = 1.2;
        inputs.extra_multipliers = vec![1.1, 0.5];

        let result = evaluate(&city, &[], &inputs, &ScenarioConfig::default());
        assert_approx(result.base_cost, 2200.0);
        assert_approx(result.adjusted_cost, 2200.0 * 1.2 * 1.1 * 0.5);
    }

    #[test]
    fn stress_scenarios_shock_income_and_rent_independently() {
        let city = sample_city();
        let result = evaluate(&city, &[], &sample_inputs(3000.0), &ScenarioConfig::default());

        let income_drop = stress_of(&result, StressKind::IncomeDrop);
        assert_approx(income_drop.income, 2400.0);
        assert_approx(income_drop.adjusted_cost, 2010.0);
        assert_approx(income_drop.tax, 624.0);
        assert_approx(income_drop.net, 2400.0 - 2010.0 - 624.0);

        let rent = stress_of(&result, StressKind::RentIncrease);
        assert_approx(rent.income, 3000.0);
        assert_approx(rent.adjusted_cost, 2010.0 + 1350.0 * 0.15);
        assert_approx(rent.net, 3000.0 - 2212.5 - 780.0);
        assert_eq!(rent.runway, Runway::Stable);

        let combined = stress_of(&result, StressKind::Combined);
        assert_approx(combined.income, 2400.0);
        assert_approx(combined.adjusted_cost, 2212.5);
        assert_approx(combined.net, 2400.0 - 2212.5 - 624.0);
        let months = combined.runway.months().expect("combined shock is a deficit");
        assert_approx(months, 6000.0 / (2212.5 + 624.0 - 2400.0));
    }

    #[test]
    fn verdict_bands_follow_ten_percent_margin() {
        let bands = VerdictBands::default();
        assert_eq!(classify_verdict(150.0, 1000.0, bands), Verdict::Sustainable);
        assert_eq!(classify_verdict(100.0, 1000.0, bands), Verdict::Tight);
        assert_eq!(classify_verdict(0.0, 1000.0, bands), Verdict::Tight);
        assert_eq!(classify_verdict(-100.0, 1000.0, bands), Verdict::Tight);
        assert_eq!(classify_verdict(-100.5, 1000.0, bands), Verdict::NotRealistic);
    }

    #[test]
    fn alternatives_are_cheaper_sorted_and_limited() {
        let cities = reference_cities();
        let lisbon = cities
            .iter()
            .find(|c| c.city == "Lisbon")
            .expect("Lisbon is in the reference table");
        let mut inputs = sample_inputs(4000.0);
        inputs.alternative_limit = Some(2);

        let result = evaluate(lisbon, &cities, &inputs, &ScenarioConfig::default());
        let names = result
            .alternatives
            .iter()
            .map(|a| a.city.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Chiang Mai", "Bangkok"]);
        assert_approx(result.alternatives[0].adjusted_cost, 1090.0);
        assert_approx(result.alternatives[0].monthly_savings, 2095.0 - 1090.0);
    }

    #[test]
    fn cheapest_city_has_no_alternatives() {
        let cities = reference_cities();
        let chiang_mai = cities
            .iter()
            .find(|c| c.city == "Chiang Mai")
            .expect("Chiang Mai is in the reference table");
        let result = evaluate(
            chiang_mai,
            &cities,
            &sample_inputs(3000.0),
            &ScenarioConfig::default(),
        );
        assert!(result.alternatives.is_empty());
    }

    #[test]
    fn empty_reference_set_yields_no_alternatives() {
        let alternatives = cheaper_alternatives(&sample_city(), &[], 1.0, None);
        assert!(alternatives.is_empty());
    }

    #[test]
    fn readiness_score_rewards_strong_profiles() {
        let city = sample_city();
        let mut strong = sample_inputs(9000.0);
        strong.savings = 50_000.0;
        let strong_result = evaluate(&city, &[], &strong, &ScenarioConfig::default());
        assert_eq!(strong_result.readiness_score, 100);

        let mut weak = sample_inputs(1000.0);
        weak.savings = 0.0;
        let weak_result = evaluate(&city, &[], &weak, &ScenarioConfig::default());
        assert_eq!(weak_result.readiness_score, 10);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let cities = reference_cities();
        let inputs = sample_inputs(3500.0);
        let a = evaluate(&cities[3], &cities, &inputs, &ScenarioConfig::default());
        let b = evaluate(&cities[3], &cities, &inputs, &ScenarioConfig::default());
        assert_eq!(a, b);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_runway_matches_sign_of_net(
            income in 0u32..12_000,
            savings in 0u32..200_000,
            lifestyle_idx in 0usize..3,
            city_idx in 0usize..21
        ) {
            let cities = reference_cities();
            let city = &cities[city_idx % cities.len()];
            let inputs = ScenarioInputs {
                income: income as f64,
                savings: savings as f64,
                lifestyle_multiplier: [0.9, 1.0, 1.2][lifestyle_idx],
                extra_multipliers: Vec::new(),
                alternative_limit: None,
            };
            let result = evaluate(city, &cities, &inputs, &ScenarioConfig::default());

            if result.net >= 0.0 {
                prop_assert_eq!(result.runway, Runway::Stable);
            } else {
                prop_assert_eq!(result.runway, Runway::Months(inputs.savings / result.net.abs()));
            }
            prop_assert!(result.readiness_score <= 100);
            for scenario in &result.stress {
                prop_assert!(scenario.net <= result.net + 1e-9);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_alternatives_exclude_current_and_are_strictly_cheaper(
            city_idx in 0usize..21,
            multiplier_bp in 5_000u32..20_000,
            limit in proptest::option::of(0usize..6)
        ) {
            let cities = reference_cities();
            let current = &cities[city_idx % cities.len()];
            let multiplier = multiplier_bp as f64 / 10_000.0;
            let current_cost = current.base_monthly_cost() * multiplier;

            let alternatives = cheaper_alternatives(current, &cities, multiplier, limit);
            if let Some(limit) = limit {
                prop_assert!(alternatives.len() <= limit);
            }
            for alt in &alternatives {
                prop_assert!(!(alt.city == current.city && alt.country == current.country));
                prop_assert!(alt.adjusted_cost < current_cost);
                prop_assert!(alt.monthly_savings > 0.0);
            }
            for pair in alternatives.windows(2) {
                prop_assert!(pair[0].adjusted_cost <= pair[1].adjusted_cost);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_verdict_and_readiness_are_monotonic(
            required in 100u32..10_000,
            net_a in -5_000i32..5_000,
            net_delta in 0i32..5_000,
            savings_a in 0u32..50_000,
            savings_delta in 0u32..50_000
        ) {
            let bands = VerdictBands::default();
            let required = required as f64;
            let low = net_a as f64;
            let high = low + net_delta as f64;
            prop_assert!(
                classify_verdict(high, required, bands) >= classify_verdict(low, required, bands)
            );

            let factors = |net: f64, savings: f64| ReadinessFactors {
                net,
                required_outlay: required,
                adjusted_cost: required * 0.8,
                savings,
                meets_income_threshold: true,
                risk_level: RiskLevel::Medium,
            };
            let weights = ReadinessWeights::default();
            let base = readiness_score(factors(low, savings_a as f64), weights);
            let more_savings = readiness_score(
                factors(low, (savings_a + savings_delta) as f64),
                weights,
            );
            let more_net = readiness_score(factors(high, savings_a as f64), weights);
            prop_assert!(more_savings >= base);
            prop_assert!(more_net >= base);
        }
    }
}
