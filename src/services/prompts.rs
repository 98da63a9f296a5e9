//! Instruction templates sent to the model.
//!
//! Both templates ask for a bare JSON object; the response parser copes
//! with the cases where the model ignores that.

/// Inputs for the belief-extraction template.
#[derive(Debug, Clone, Copy)]
pub struct BeliefPromptInput<'a> {
    pub role_profile: &'a str,
    pub role_name: &'a str,
    pub context_summary: &'a str,
    pub action_description: &'a str,
    pub recent_memory_summary: &'a str,
}

/// Render the belief-extraction instruction.
pub fn render_belief_prompt(input: &BeliefPromptInput<'_>) -> String {
    format!(
        "You are inspecting the internal reasoning of a {profile} named {name}.\n\
         \n\
         From the context below and the action this agent is about to take, \
         reconstruct the agent's belief state at this moment.\n\
         \n\
         ## Current context\n\
         {context}\n\
         \n\
         ## Action about to be taken\n\
         {action}\n\
         \n\
         ## Recent memory\n\
         {memory}\n\
         \n\
         ## Output\n\
         Answer with one JSON object and nothing else:\n\
         {{\n  \
           \"global_state\": \"how the agent understands the overall project state\",\n  \
           \"current_goal\": \"the concrete goal the agent is pursuing right now\",\n  \
           \"teammate_model\": {{\"TeammateName\": \"what the agent believes about this teammate\"}},\n  \
           \"identified_risks\": [\"each risk the agent has actually noticed\"]\n\
         }}\n\
         \n\
         `identified_risks` matters most. If the agent has not noticed a risk, \
         leave it out; an empty list is a valid answer.\n",
        profile = input.role_profile,
        name = input.role_name,
        context = input.context_summary,
        action = input.action_description,
        memory = input.recent_memory_summary,
    )
}

/// Render the divergence-judging instruction for one aligned pair.
///
/// Both arguments are the pretty-printed JSON of the two belief records.
pub fn render_divergence_prompt(reference_json: &str, failed_json: &str) -> String {
    format!(
        "You compare the belief states of the same agent at the same workflow \
         step in two runs of one task.\n\
         \n\
         ## Reference belief state (run that succeeded)\n\
         ```json\n\
         {reference_json}\n\
         ```\n\
         \n\
         ## Belief state under test (run that failed)\n\
         ```json\n\
         {failed_json}\n\
         ```\n\
         \n\
         ## Output\n\
         Score how far apart the two belief states are. Answer with one JSON \
         object and nothing else:\n\
         {{\n  \
           \"global_divergence\": <number 0-1>,\n  \
           \"goal_divergence\": <number 0-1>,\n  \
           \"teammate_divergence\": <number 0-1>,\n  \
           \"risk_divergence\": <number 0-1>,\n  \
           \"overall_divergence\": <number 0-1>,\n  \
           \"explanation\": \"the key differences, especially in identified risks\"\n\
         }}\n\
         \n\
         Scale: 0.0 identical, 0.3 minor, 0.5 moderate, 0.7 significant, 1.0 opposite.\n\
         `risk_divergence` must be high when one side identifies a critical risk \
         the other misses.\n"
    )
}
