pub const SYSTEM_PROMPT: &str = r#"You are a recruiting assistant for the Indian job market. You evaluate job listings against a candidate profile and give practical job-search advice.

When asked for JSON, respond with valid JSON only. Do not wrap it in markdown and do not add commentary."#;

pub fn build_ranking_prompt(role: &str, experience: u32, listings_json: &str) -> String {
    format!(
        r#"Rank the following job listings for a '{role}' with {experience} years of experience in India.

For each job, provide a relevance score (0-100) and a short 1-sentence reason.
Respond ONLY with a JSON array of objects, containing 'id', 'score' (number), and 'reason' (string).
Use the exact 'id' values given below.

Jobs:
{listings_json}"#
    )
}

pub fn build_tips_prompt(role: &str, experience: u32) -> String {
    format!(
        "Provide exactly 3 concise job search tips for a {role} with {experience} years experience in India. \
         Output strictly as JSON array with objects containing 'tip' (string) and 'icon' (emoji)."
    )
}

pub fn build_query_prompt(role: &str, experience: u32, count: usize) -> String {
    format!(
        r#"Generate exactly {count} optimized job search query variations for Google Jobs for a '{role}' with {experience} years experience in India.
Consider synonyms, related titles, and seniority based on experience.
Return ONLY a JSON array of strings. Do not include 'jobs' or 'India' in every single one if redundant, but keep intent clear.
Example format: ["Query 1", "Query 2"]"#
    )
}

pub fn build_cover_letter_prompt(
    applicant_name: &str,
    title: &str,
    company: &str,
    description_snippet: &str,
) -> String {
    format!(
        r#"Write a 3-paragraph personalized cover letter for {applicant_name} applying for the following job at {company}.
Job Title: {title}
Job Description snippet: {description_snippet}
Make it professional and concise."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranking_prompt_embeds_listings() {
        let prompt = build_ranking_prompt("Python Developer", 3, r#"[{"id":"x"}]"#);
        assert!(prompt.contains("'Python Developer' with 3 years"));
        assert!(prompt.ends_with(r#"[{"id":"x"}]"#));
    }

    #[test]
    fn test_query_prompt_count() {
        assert!(build_query_prompt("SRE", 5, 5).contains("exactly 5 optimized"));
    }
}
