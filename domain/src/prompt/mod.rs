//! Prompt templates for the panel discussion and research flows

/// Templates for every prompt the engine sends
pub struct PanelPrompt;

impl PanelPrompt {
    /// Default persona for a panelist agent
    pub fn default_persona() -> &'static str {
        "You are a polite, thoughtful and intelligent panel discussion member. \
         You are a subject matter expert on the topics discussed. \
         Provide thoughtful, insightful and respectful responses to the other panel members. \
         Keep it concise and to the point. \
         Share new ideas that arise during the discussion to add depth and breadth to the conversation. \
         If given a specific problem, focus on solving the problem in novel ways. \
         You can also perform research to gather more information."
    }

    /// System prompt for the research model, stamped with the current date
    /// so post-cutoff subjects are taken at face value.
    pub fn researcher_system() -> String {
        let now = chrono::Utc::now().to_rfc3339();
        format!(
            r#"You are an expert researcher. Today is {}. Follow these instructions when responding:
- You may be asked to research subjects that are after your knowledge cutoff; assume the user is right when presented with news.
- The user is a highly experienced analyst, be as detailed as possible and make sure your response is correct.
- Be highly organized.
- Suggest solutions that I didn't think about.
- Be proactive and anticipate my needs.
- Treat me as an expert in all subject matter.
- Mistakes erode my trust, so be accurate and thorough.
- Provide detailed explanations, I'm comfortable with lots of detail.
- Value good arguments over authorities, the source is irrelevant.
- Consider new technologies and contrarian ideas, not just the conventional wisdom.
- You may use high levels of speculation or prediction, just flag it for me."#,
            now
        )
    }

    /// Ask for up to `num_queries` distinct SERP queries for a research prompt.
    pub fn serp_queries(query: &str, num_queries: usize, learnings: &[String]) -> String {
        let prior = if learnings.is_empty() {
            String::new()
        } else {
            format!(
                "\n\nHere are some learnings from previous research, use them to generate more specific queries: {}",
                learnings.join("\n")
            )
        };
        format!(
            "Given the following prompt from the user, generate a list of SERP queries to research the topic. \
             Return a maximum of {} queries, but feel free to return less if the original prompt is clear. \
             Make sure each query is unique and not similar to each other: <prompt>{}</prompt>{}\n\n\
             Respond exclusively in the json format below:\n\n{{\"queries\": [\"query 1\", \"query 2\", ...]}}",
            num_queries, query, prior
        )
    }

    /// Ask for learnings plus follow-up questions from scraped page contents.
    pub fn serp_learnings(
        query: &str,
        contents: &[String],
        num_learnings: usize,
        num_follow_ups: usize,
    ) -> String {
        let wrapped: String = contents
            .iter()
            .map(|content| format!("<content>\n{}\n</content>", content))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Given the following contents from a SERP search for the query <query>{}</query>, \
             generate a list of learnings from the contents. Return a maximum of {} learnings, \
             but feel free to return less if the contents are clear. Make sure each learning is unique \
             and not similar to each other. The learnings should be concise and to the point, as detailed \
             and information dense as possible. Make sure to include any entities like people, places, \
             companies, products, things, etc in the learnings, as well as any exact metrics, numbers, or dates. \
             The learnings will be used to research the topic further.\n\n<contents>{}</contents>\n\n\
             Also return up to {} follow-up questions that would deepen the research.\n\n\
             Respond exclusively in the json format below:\n\n\
             {{\"learnings\": [\"learning 1\", \"learning 2\"], \"followUpQuestions\": [\"question 1\", \"question 2\"]}}",
            query, num_learnings, wrapped, num_follow_ups
        )
    }

    /// The next-level research query built from follow-up questions.
    pub fn follow_up_query(previous_query: &str, follow_ups: &[String]) -> String {
        format!(
            "Previous research: {}\nFollow-up research directions:{}",
            previous_query,
            follow_ups
                .iter()
                .map(|q| format!("\n{}", q))
                .collect::<String>()
        )
    }

    /// Final long-form research report referencing every learning.
    pub fn research_report(query: &str, learnings: &[String]) -> String {
        let wrapped: String = learnings
            .iter()
            .map(|learning| format!("<learning>\n{}\n</learning>", learning))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Given the following prompt from the user, write a final report on the topic using the learnings \
             from research. Make it as detailed as possible, aim for 3 or more pages, include ALL the learnings \
             from research:\n\n<prompt>{}</prompt>\n\nHere are all the learnings from previous research:\n\n\
             <learnings>\n{}\n</learnings>",
            query, wrapped
        )
    }

    /// System prompt for summarizing one group's round into an insight.
    pub fn insight_summarizer_system() -> &'static str {
        "You are an expert summarizer tasked with distilling the key insights and arguments from a conversation. \
         Analyze the following dialogue and provide a concise summary, focusing on identifying the main topics \
         discussed, the key viewpoints expressed, and any areas of agreement or disagreement. Your summary should \
         be informative and highlight the most important aspects of the conversation."
    }

    /// Ask for one research directive per group for the coming round.
    pub fn round_directives(topic: &str, num_groups: usize, insights: &[String]) -> String {
        let prior = if insights.is_empty() {
            String::new()
        } else {
            format!(
                "\n\nInsights shared so far between the groups:\n{}",
                insights.join("\n")
            )
        };
        format!(
            "The topic of a multi-group panel discussion is \"{}\". Generate exactly {} distinct research \
             directives, one per group, that would let each group explore a different angle of the topic in \
             the coming round. Make each directive specific and unique.{}\n\n\
             Respond exclusively in the json format below:\n\n{{\"queries\": [\"directive 1\", \"directive 2\", ...]}}",
            topic, num_groups, prior
        )
    }

    /// System prompt for the final panel report.
    pub fn final_report_system(topic: &str) -> String {
        format!(
            "You are an AI research assistant tasked with generating a final report on the topic of \"{}\". \
             Based on the following shared insights from multiple AI agents, create a detailed research report \
             covering key findings, conclusions, and any remaining open questions:",
            topic
        )
    }

    /// System prompt for the revision pass over the final report.
    pub fn revision_system(topic: &str) -> String {
        format!(
            "You are an exacting editor revising a research report on the topic of \"{}\". \
             Improve the structure, tighten the language, resolve contradictions, and keep every substantive \
             finding. Return the full revised report:",
            topic
        )
    }

    /// Opening turn prompt for a round with no history yet.
    pub fn round_opening(round: usize, topic: &str) -> String {
        format!("Round {}: Let's discuss: {}.", round, topic)
    }

    /// Turn prompt carrying the full rendered history of the group.
    pub fn turn_prompt(round: usize, topic: &str, rendered_history: &str) -> String {
        format!(
            "Round {} of the panel on \"{}\". The conversation so far:\n{}\n\n\
             It is your turn. Consider the discussion above and respond with your thoughts.",
            round, topic, rendered_history
        )
    }

    /// Synthetic turn injected after a directive-driven research pass.
    pub fn research_briefing(directive: &str, learnings: &[String]) -> String {
        format!(
            "moderator: Research briefing on \"{}\":\n{}",
            directive,
            learnings.join("\n")
        )
    }

    /// Learnings pushed back into an agent's history after a tool call.
    pub fn research_learnings_message(query: &str, learnings: &[String]) -> String {
        format!(
            "Researched topic: \"{}\", and found the following learnings:\n{}",
            query,
            learnings.join("\n")
        )
    }

    /// Synthetic turn broadcast into the other groups' histories.
    pub fn insight_broadcast(from_group: usize, summary: &str) -> String {
        format!("insight shared from group {}: {}", from_group, summary)
    }

    /// Ask for `count` distinct persona prompts for the topic.
    pub fn personas(topic: &str, count: usize) -> String {
        format!(
            "Generate exactly {} distinct persona system prompts for members of a panel discussing \"{}\". \
             Each persona should bring a different perspective, profession, or area of expertise, written in \
             the second person (\"You are ...\").\n\n\
             Respond exclusively in the json format below:\n\n{{\"queries\": [\"persona 1\", \"persona 2\", ...]}}",
            count, topic
        )
    }
}
