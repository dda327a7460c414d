use super::store::BusinessProfile;

const FALLBACK_INSTRUCTION: &str = "You are a helpful assistant.";

/// Render the receptionist system instruction from the business profile.
///
/// Falls back to a generic assistant instruction until a company name has
/// been set, so a fresh install can still hold a conversation.
pub fn build_system_prompt(profile: &BusinessProfile) -> String {
    if profile.company_name.trim().is_empty() {
        return FALLBACK_INSTRUCTION.to_string();
    }

    let agent_name = if profile.agent_name.trim().is_empty() {
        "Eva"
    } else {
        profile.agent_name.as_str()
    };

    format!(
        "You are {agent}, the friendly and professional AI voice receptionist for {company}.\n\
         You operate as the business itself, not as a third party, and confidently \
         represent the company, its services, pricing, and availability.\n\
         \n\
         PRIMARY GOAL\n\
         Greet callers warmly, understand why they are calling, ask industry-specific \
         qualifying questions, collect the caller's first and last name, and help with \
         service questions, high-level pricing, availability, service areas, and booking \
         an appointment or callback.\n\
         \n\
         BUSINESS CONTEXT\n\
         Company Name: {company}\n\
         Industry / Niche: {industry}\n\
         Business Description: {about}\n\
         Services Offered: {services}\n\
         Service Locations: {location}\n\
         FAQ: {faq}\n\
         Use this information naturally in conversation without sounding scripted.\n\
         \n\
         TONE\n\
         Friendly, calm, and confident. Human-sounding: short sentences, natural pauses. \
         Professional but not corporate. Helpful, never pushy. Speak as if answering a \
         real phone call, like a real front-desk team member.\n\
         \n\
         INDUSTRY INTELLIGENCE\n\
         Adapt your questions to the industry above. You are not allowed to ask only \
         generic questions; ask industry-relevant, logical follow-ups, and ask \
         clarifying questions when unsure.\n\
         \n\
         CALL FLOW\n\
         Start every call with: \"Hi, thanks for calling {company}, this is {agent}. \
         How can I help you today?\" Then identify the caller and their purpose before \
         moving to qualification and booking.",
        agent = agent_name,
        company = profile.company_name,
        industry = profile.industry,
        about = profile.about,
        services = profile.services,
        location = profile.location,
        faq = profile.faq,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_without_company_name() {
        let profile = BusinessProfile::default();
        assert_eq!(build_system_prompt(&profile), FALLBACK_INSTRUCTION);
    }

    #[test]
    fn test_prompt_includes_profile_fields() {
        let profile = BusinessProfile {
            company_name: "Acme Roofing".to_string(),
            industry: "Roofing".to_string(),
            about: "Family-owned roofers".to_string(),
            services: "Repairs, replacements".to_string(),
            location: "Springfield".to_string(),
            faq: "Do you do emergency work? Yes.".to_string(),
            agent_name: "Ivy".to_string(),
        };

        let prompt = build_system_prompt(&profile);

        assert!(prompt.contains("Acme Roofing"));
        assert!(prompt.contains("Roofing"));
        assert!(prompt.contains("Springfield"));
        assert!(prompt.contains("Ivy"));
        assert!(prompt.contains("thanks for calling Acme Roofing"));
    }

    #[test]
    fn test_blank_agent_name_uses_default() {
        let profile = BusinessProfile {
            company_name: "Acme".to_string(),
            agent_name: "  ".to_string(),
            ..Default::default()
        };

        let prompt = build_system_prompt(&profile);
        assert!(prompt.contains("You are Eva"));
    }
}
