use std::fmt::Write as _;

use crate::qualification::domain::{OfferContext, ProspectRecord};

/// Minimal prompt used by the connectivity probe.
pub(crate) const CONNECTIVITY_PROMPT: &str = "Respond with OK if you can read this message.";

/// Builds the classification prompt: prospect profile, offer context, the
/// scoring rubric, and the required response shape.
pub(crate) fn build_classification_prompt(
    prospect: &ProspectRecord,
    offer: &OfferContext,
) -> String {
    let mut prompt = String::new();

    writeln!(
        prompt,
        "You are qualifying a sales lead for the product below."
    )
    .expect("write intro");
    writeln!(prompt, "\nProduct: {}", offer.name).expect("write product");

    writeln!(prompt, "Value propositions:").expect("write vp header");
    for value_proposition in &offer.value_propositions {
        writeln!(prompt, "- {value_proposition}").expect("write vp");
    }

    writeln!(prompt, "Ideal use cases:").expect("write uc header");
    for use_case in &offer.ideal_use_cases {
        writeln!(prompt, "- {use_case}").expect("write uc");
    }

    writeln!(prompt, "\nProspect:").expect("write prospect header");
    writeln!(prompt, "Name: {}", prospect.name).expect("write name");
    writeln!(prompt, "Role: {}", prospect.role).expect("write role");
    writeln!(prompt, "Company: {}", prospect.company).expect("write company");
    writeln!(prompt, "Industry: {}", prospect.industry).expect("write industry");
    writeln!(prompt, "Location: {}", prospect.location).expect("write location");
    writeln!(prompt, "Summary: {}", prospect.professional_summary).expect("write summary");

    writeln!(
        prompt,
        "\nClassify this prospect's buying intent as High, Medium, or Low and explain briefly."
    )
    .expect("write instruction");
    writeln!(
        prompt,
        "Weigh decision authority, industry alignment, company fit, and engagement signals."
    )
    .expect("write rubric");
    writeln!(prompt, "\nRespond in exactly this format:").expect("write format header");
    writeln!(prompt, "Intent: <High|Medium|Low>").expect("write format intent");
    write!(prompt, "Reasoning: <one or two sentences>").expect("write format reasoning");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_profile_offer_and_response_shape() {
        let offer = OfferContext::new(
            "Outbound Copilot",
            vec!["Personalized outreach at scale".to_string()],
            vec!["B2B SaaS mid-market".to_string()],
        )
        .expect("valid offer");
        let prospect = ProspectRecord::new(
            "Jamie Rivera",
            "VP Sales",
            "Acme Corp",
            "Technology",
            "Denver, CO",
            "Runs a 40-rep outbound org.",
        )
        .expect("valid prospect");

        let prompt = build_classification_prompt(&prospect, &offer);
        assert!(prompt.contains("Product: Outbound Copilot"));
        assert!(prompt.contains("- B2B SaaS mid-market"));
        assert!(prompt.contains("Role: VP Sales"));
        assert!(prompt.contains("Intent: <High|Medium|Low>"));
        assert!(prompt.contains("Reasoning:"));
    }
}
