//! Demo that runs the mock fixture (one user, a handful of services) through
//! the recommender and prints the JSON response body.

use gov_service_recommender::config::ScoringConfig;
use gov_service_recommender::model::{ActivityLevel, Seasonality, Service, User};
use gov_service_recommender::recommender;

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let user = User {
        id: 1001,
        name: "Sara Alahmadi".to_string(),
        activity_level: ActivityLevel::High,
        phone: "+966500000001".to_string(),
    };

    let services = vec![
        Service {
            id: 1,
            name: "Passport renewal".to_string(),
            days_left: 28,
            seasonality: Seasonality::InSeason,
            category_importance: 0.9,
        },
        Service {
            id: 2,
            name: "Driving license renewal".to_string(),
            days_left: -2,
            seasonality: Seasonality::OffSeason,
            category_importance: 0.85,
        },
        Service {
            id: 3,
            name: "Vehicle registration".to_string(),
            days_left: 75,
            seasonality: Seasonality::OffSeason,
            category_importance: 0.6,
        },
        Service {
            id: 4,
            name: "Address update".to_string(),
            days_left: 300,
            seasonality: Seasonality::OffSeason,
            category_importance: 0.2,
        },
    ];

    let cfg = ScoringConfig::load().expect("load scoring config");
    let result = recommender::rank(&user, &services, 5, &cfg);

    println!(
        "{}",
        serde_json::to_string_pretty(&result).expect("serialize result")
    );
}
