//! Prompt templates. Context and user inputs are embedded verbatim; no
//! truncation happens here (the retriever already bounds the context).

pub fn grounded_answer(context: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant that answers questions based on provided context.\n\
         Answer based ONLY on the context below. Include the relevant details and\n\
         examples the context offers, and if it does not contain enough information,\n\
         say what is missing. Use short plain-text paragraphs; no markup, no chunk\n\
         references.\n\n\
         CONTEXT:\n{context}\n\n\
         QUESTION: {question}\n\n\
         Answer:"
    )
}

pub fn semantic_skill_match(required: &[String], offered: &[String], job_description: &str) -> String {
    format!(
        "Analyze the skill match between required skills and candidate skills for this job.\n\
         Treat semantically similar skills as matching (e.g. \"Node.js\" and \"Backend JavaScript\").\n\n\
         Job Description: {job_description}\n\
         Required Skills: {}\n\
         Candidate Skills: {}\n\n\
         Return ONLY a JSON object with these keys:\n\
         {{\"semantic_match_score\": float between 0.0 and 1.0,\n\
          \"matching_skills\": [list of matching skills],\n\
          \"skill_gaps\": [list of missing skills]}}",
        required.join(", "),
        offered.join(", ")
    )
}

pub fn resume_extraction(text: &str) -> String {
    format!(
        "You are an expert resume parser. Extract structured information from the\n\
         resume text below and return ONLY a valid JSON object with these exact keys:\n\
         {{\"name\": \"Full Name\", \"email\": \"Email Address\", \"skills\": [..],\n\
          \"work_experience\": [{{\"company\": .., \"role\": .., \"duration\": \"MM/YYYY - MM/YYYY\",\n\
          \"responsibilities\": [..]}}],\n\
          \"education\": [{{\"degree\": .., \"institution\": .., \"year\": \"YYYY\"}}],\n\
          \"certifications\": [{{\"name\": .., \"issuer\": .., \"year\": \"YYYY\"}}]}}\n\
         Use an empty string or empty array for anything the text does not contain.\n\
         No additional text, no markdown formatting.\n\n\
         Resume Text: {text}"
    )
}

pub fn communication_evaluation(answers_json: &str) -> String {
    format!(
        "You are an expert communication skills evaluator. Assess the candidate's\n\
         written answers for clarity, structure, and professional tone.\n\
         Score 0-100: clarity up to 40 points, structure up to 30, tone up to 30.\n\
         Return ONLY a JSON object with keys: communication_score (integer),\n\
         clarity_assessment, structure_assessment, tone_assessment,\n\
         strengths (list), weaknesses (list).\n\n\
         Answers: {answers_json}"
    )
}

pub fn cultural_fit(candidate_json: &str, job_description: &str, context: &str) -> String {
    format!(
        "You are an expert cultural fit evaluator. Assess the candidate's alignment\n\
         with the cultural requirements in the job description, matching attributes\n\
         semantically (e.g. \"team player\" and \"collaborative\"). Avoid any\n\
         demographic assumptions.\n\n\
         Retrieved Context: {context}\n\
         Job Description: {job_description}\n\
         Candidate Data: {candidate_json}\n\n\
         Return ONLY a JSON object with keys: cultural_fit_score (integer 0-100),\n\
         matched_cultural_attributes (list of {{attribute, jd_requirement, evidence}}),\n\
         cultural_fit_report, strengths (list), weaknesses (list),\n\
         coverage_percentage (float)."
    )
}

pub fn technical_evaluation(candidate_json: &str, job_description: &str, context: &str) -> String {
    format!(
        "You are an expert technical evaluator. Assess the candidate's skills and\n\
         project work against the job description, using the retrieved context to\n\
         match semantically similar skills and avoid false positives.\n\n\
         Retrieved Context: {context}\n\
         Job Description: {job_description}\n\
         Candidate Data: {candidate_json}\n\n\
         Return ONLY a JSON object with keys:\n\
         matched_skills (list of {{skill, jd_requirement, proficiency, evidence}}),\n\
         technical_answers_score (\"Low\"|\"Medium\"|\"High\"),\n\
         overall_technical_fit (\"Low\"|\"Medium\"|\"High\"),\n\
         coverage_percentage (float)."
    )
}

pub fn optional_factors(technical_json: &str, cultural_json: &str) -> String {
    format!(
        "Assess optional factors for a candidate: project impact (up to 60 points)\n\
         and certification relevance (up to 40 points), based on the evaluations\n\
         below. Return ONLY a JSON object with keys:\n\
         optional_factors_score (integer 0-100), assessment (string).\n\n\
         Technical Evaluation: {technical_json}\n\
         Cultural Evaluation: {cultural_json}"
    )
}
