//! CTE preference resolution.

use serde::{Deserialize, Serialize};

use crate::config::{LaborCodes, PreferenceMap};
use crate::models::{AuditStep, PayType};

/// The overtime treatment in effect for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePreference {
    /// Whether the employee is mapped as preferring CTE.
    pub cte_preferred: bool,
    /// The overtime pay type to use.
    pub pay_type: PayType,
    /// The labor code for that pay type.
    pub code: String,
    /// The audit step recording the lookup.
    pub audit_step: AuditStep,
}

/// Resolves CTE preference for an employee.
///
/// Only an explicit `true` in the mapping selects CTE; absent ids and ids
/// mapped to `false` get standard overtime. The mapping is only read.
///
/// # Example
///
/// ```
/// use segment_engine::calculation::resolve_overtime_preference;
/// use segment_engine::config::{LaborCodes, PreferenceMap};
/// use segment_engine::models::PayType;
///
/// let prefs = PreferenceMap::from_ids(["2964"]);
/// let codes = LaborCodes::default();
///
/// let preferred = resolve_overtime_preference("2964", &prefs, &codes, 1);
/// assert_eq!(preferred.pay_type, PayType::Cte);
/// assert_eq!(preferred.code, "3002");
///
/// let standard = resolve_overtime_preference("1234", &prefs, &codes, 1);
/// assert_eq!(standard.pay_type, PayType::Ot);
/// assert_eq!(standard.code, "1013");
/// ```
pub fn resolve_overtime_preference(
    employee_id: &str,
    preferences: &PreferenceMap,
    codes: &LaborCodes,
    step_number: u32,
) -> OvertimePreference {
    let mapped = preferences.get(employee_id);
    let cte_preferred = mapped.unwrap_or(false);
    let pay_type = if cte_preferred { PayType::Cte } else { PayType::Ot };
    let code = codes.pay_code(pay_type).to_string();

    let reasoning = match mapped {
        Some(true) => format!("Employee {} is mapped as preferring CTE", employee_id),
        Some(false) => format!(
            "Employee {} is mapped as not preferring CTE; standard overtime",
            employee_id
        ),
        None => format!(
            "Employee {} is not in the preference mapping; standard overtime",
            employee_id
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "cte_preference".to_string(),
        rule_name: "CTE Preference Resolution".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "mapped": mapped
        }),
        output: serde_json::json!({
            "cte_preferred": cte_preferred,
            "pay_type": pay_type,
            "code": code
        }),
        reasoning,
    };

    OvertimePreference {
        cte_preferred,
        pay_type,
        code,
        audit_step,
    }
}
