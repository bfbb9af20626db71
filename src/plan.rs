//! The default seller-replacement plan.

use action_flow::{AutomationPlan, FieldStep};
use tracing::error;

fn edit_button(section: &str) -> String {
    format!(r#"p[data-testid="seller-{section}-header"] button[data-testid="edit-btn"]"#)
}

fn input(name: &str) -> String {
    format!(r#"input[name="{name}"]"#)
}

fn step(label: &str, section: &str, fields: &[(&str, &str)]) -> FieldStep {
    FieldStep {
        label: Some(label.to_string()),
        reveal_selector: edit_button(section),
        input_selectors: fields.iter().map(|(name, _)| input(name)).collect(),
        values: fields.iter().map(|(_, value)| value.to_string()).collect(),
        confirm_with_enter: true,
    }
}

/// Replace the consignor's contact details with the house account before publishing.
pub fn replacement_plan() -> AutomationPlan {
    let steps = vec![
        step(
            "seller name",
            "name",
            &[("seller_first_name", "DVF"), ("seller_last_name", "ReWrap")],
        ),
        step("seller email", "email", &[("seller_email", "dvf@trove.co")]),
        step("seller phone", "phone", &[("seller_phone", "888-888-8888")]),
        step(
            "seller address",
            "address",
            &[
                ("seller_address_line1", "872 Washington Street"),
                ("seller_address_line2", ""),
                ("seller_city", "New York"),
                ("seller_state", "NY"),
                ("seller_postal", "10014"),
                ("seller_country", "US"),
            ],
        ),
    ];
    AutomationPlan::new(steps).unwrap_or_else(|err| {
        error!(error = %err, "Built-in replacement plan is invalid");
        AutomationPlan::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacement_plan_is_valid() {
        let plan = replacement_plan();
        assert_eq!(plan.len(), 4);
        assert!(plan.steps().iter().all(|step| step.validate().is_ok()));
        assert!(plan.steps().iter().all(|step| step.confirm_with_enter));
    }

    #[test]
    fn address_step_clears_second_line() {
        let plan = replacement_plan();
        let address = &plan.steps()[3];
        assert_eq!(
            address.reveal_selector,
            r#"p[data-testid="seller-address-header"] button[data-testid="edit-btn"]"#
        );
        assert_eq!(address.input_selectors[1], r#"input[name="seller_address_line2"]"#);
        assert_eq!(address.values[1], "");
        assert_eq!(address.values.len(), 6);
    }
}
