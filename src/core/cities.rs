use super::geo::compare_names;
use super::types::{CityCostProfile, RiskLevel};

// city, country, rent, food, transport, insurance, coworking, tax rate, visa income, risk
type CostRow = (
    &'static str,
    &'static str,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    f64,
    RiskLevel,
);

const COST_TABLE: [CostRow; 21] = [
    ("Bangkok", "Thailand", 700.0, 320.0, 90.0, 120.0, 160.0, 0.10, 2000.0, RiskLevel::Medium),
    ("Chiang Mai", "Thailand", 520.0, 260.0, 70.0, 110.0, 130.0, 0.10, 1800.0, RiskLevel::Low),
    ("Phuket", "Thailand", 780.0, 340.0, 95.0, 120.0, 170.0, 0.10, 2200.0, RiskLevel::Medium),
    ("Lisbon", "Portugal", 1250.0, 420.0, 75.0, 160.0, 190.0, 0.22, 2800.0, RiskLevel::Low),
    ("Porto", "Portugal", 980.0, 360.0, 70.0, 150.0, 170.0, 0.21, 2400.0, RiskLevel::Low),
    ("Berlin", "Germany", 1400.0, 430.0, 95.0, 220.0, 210.0, 0.27, 3200.0, RiskLevel::Low),
    ("Munich", "Germany", 1850.0, 470.0, 95.0, 230.0, 220.0, 0.29, 3600.0, RiskLevel::Low),
    ("Hamburg", "Germany", 1500.0, 420.0, 90.0, 220.0, 200.0, 0.27, 3300.0, RiskLevel::Low),
    ("Amsterdam", "Netherlands", 1900.0, 510.0, 115.0, 210.0, 240.0, 0.31, 3800.0, RiskLevel::Low),
    ("Rotterdam", "Netherlands", 1450.0, 460.0, 105.0, 205.0, 210.0, 0.29, 3400.0, RiskLevel::Low),
    ("Paris", "France", 2050.0, 520.0, 95.0, 230.0, 260.0, 0.31, 3900.0, RiskLevel::Medium),
    ("Lyon", "France", 1380.0, 430.0, 80.0, 210.0, 200.0, 0.28, 3100.0, RiskLevel::Low),
    ("Toronto", "Canada", 2050.0, 540.0, 120.0, 240.0, 250.0, 0.30, 4200.0, RiskLevel::Low),
    ("Vancouver", "Canada", 2200.0, 560.0, 125.0, 240.0, 260.0, 0.31, 4300.0, RiskLevel::Low),
    ("Montreal", "Canada", 1450.0, 460.0, 95.0, 220.0, 220.0, 0.27, 3400.0, RiskLevel::Low),
    ("Sydney", "Australia", 2200.0, 590.0, 130.0, 250.0, 270.0, 0.32, 4600.0, RiskLevel::Low),
    ("Melbourne", "Australia", 1950.0, 550.0, 125.0, 245.0, 250.0, 0.31, 4300.0, RiskLevel::Low),
    ("New York", "USA", 2900.0, 680.0, 135.0, 360.0, 320.0, 0.33, 5200.0, RiskLevel::Medium),
    ("Miami", "USA", 2300.0, 610.0, 140.0, 340.0, 280.0, 0.28, 4500.0, RiskLevel::Medium),
    ("Austin", "USA", 1900.0, 560.0, 120.0, 330.0, 250.0, 0.27, 4200.0, RiskLevel::Low),
    ("Los Angeles", "USA", 2700.0, 650.0, 145.0, 350.0, 300.0, 0.32, 5000.0, RiskLevel::Medium),
];

pub fn reference_cities() -> Vec<CityCostProfile> {
    COST_TABLE
        .iter()
        .map(
            |&(city, country, rent, food, transport, insurance, coworking, tax_rate, visa, risk)| {
                CityCostProfile {
                    city: city.to_string(),
                    country: country.to_string(),
                    rent,
                    food,
                    transport,
                    insurance,
                    coworking: Some(coworking),
                    tax_rate,
                    visa_income_requirement: visa,
                    risk_level: risk,
                }
            },
        )
        .collect()
}

pub fn find_city<'a>(cities: &'a [CityCostProfile], name: &str) -> Option<&'a CityCostProfile> {
    let wanted = name.trim();
    cities.iter().find(|c| c.city.eq_ignore_ascii_case(wanted))
}

pub fn sorted_for_display(cities: &[CityCostProfile]) -> Vec<CityCostProfile> {
    let mut sorted = cities.to_vec();
    sorted.sort_by(|a, b| {
        compare_names(&a.country, &b.country).then_with(|| compare_names(&a.city, &b.city))
    });
    sorted
}
