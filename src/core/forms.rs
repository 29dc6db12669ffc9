use crate::domain::model::{CampaignDraft, LoanApplication, CAMPAIGN_CATEGORIES};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    as_input_error, validate_non_empty_string, validate_positive_number, validate_range, Validate,
};

/// 申請表單的年齡欄位範圍
pub const MIN_STUDENT_AGE: u32 = 3;
pub const MAX_STUDENT_AGE: u32 = 35;

fn check_loan(application: &LoanApplication) -> Result<()> {
    validate_non_empty_string("user_id", &application.user_id)?;
    validate_non_empty_string("school_id", &application.school_id)?;
    validate_non_empty_string("student_name", &application.student_name)?;
    validate_non_empty_string("class_applying_for", &application.class_applying_for)?;
    validate_range(
        "student_age",
        application.student_age,
        MIN_STUDENT_AGE,
        MAX_STUDENT_AGE,
    )?;
    validate_positive_number("loan_amount", application.loan_amount, 1)?;
    Ok(())
}

fn check_campaign(draft: &CampaignDraft) -> Result<()> {
    validate_non_empty_string("title", &draft.title)?;
    validate_non_empty_string("description", &draft.description)?;
    validate_non_empty_string("school", &draft.school)?;
    validate_non_empty_string("story", &draft.story)?;
    validate_positive_number("target_amount", draft.target_amount, 1)?;

    if !CAMPAIGN_CATEGORIES.contains(&draft.category.as_str()) {
        return Err(AppError::ValidationError {
            message: format!(
                "Unknown category '{}'. Valid categories: {}",
                draft.category,
                CAMPAIGN_CATEGORIES.join(", ")
            ),
        });
    }
    Ok(())
}

impl Validate for LoanApplication {
    fn validate(&self) -> Result<()> {
        check_loan(self).map_err(as_input_error)
    }
}

impl Validate for CampaignDraft {
    fn validate(&self) -> Result<()> {
        check_campaign(self).map_err(as_input_error)
    }
}
