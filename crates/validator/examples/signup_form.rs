//! Validates a sign-up form declared as JSON and prints the error report.

use fieldcheck_validator::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let engine = Engine::new();
    let rules = Rules::from_json(&json!({
        "login": {
            "title": "Login",
            "validators": {"required": true, "lengthInRange": [3, 12]},
            "trimValue": true,
        },
        "email": ["required", "email"],
        "age": {"validators": {"minValue": 18}, "int": true},
        "password": "required",
        "confirm": {
            "equalsToField": {
                "values": [{"dependsField": "password"}],
                "message": "Must match the '{0}' field",
            },
        },
    }))?;

    let mut form = json!({
        "login": "  neo  ",
        "email": "neo@matrix",
        "age": "17",
        "password": "red pill",
        "confirm": "blue pill",
    });

    let outcome = engine.validate(&mut form, &rules, true)?;
    println!("valid: {}", outcome.is_valid());
    println!("coerced form: {form:#}");
    if let Ok(report) = serde_json::to_string_pretty(&outcome) {
        println!("report: {report}");
    }

    for field in outcome.failed_fields() {
        if let Some(message) = outcome.field(field).and_then(FieldReport::first_message) {
            println!("{field}: {message}");
        }
    }
    Ok(())
}
