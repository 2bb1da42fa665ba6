//! Prompt templates for the skill oracle

/// Prompt templates with `{placeholder}` substitution.
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub requirements_system: String,
    pub resume_system: String,
    pub matching_system: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            requirements_system: REQUIREMENTS_SYSTEM.to_string(),
            resume_system: RESUME_SYSTEM.to_string(),
            matching_system: MATCHING_SYSTEM.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_requirements_user(&self, job_description: &str) -> String {
        REQUIREMENTS_USER.replace("{job_description}", job_description)
    }

    pub fn render_resume_user(&self, resume_text: &str) -> String {
        RESUME_USER.replace("{resume_text}", resume_text)
    }

    pub fn render_matching_user(&self, required_skill: &str, candidate_skills: &str) -> String {
        MATCHING_USER
            .replace("{required_skill}", required_skill)
            .replace("{candidate_skills}", candidate_skills)
    }
}

const REQUIREMENTS_SYSTEM: &str = r#"You are an expert at analyzing job descriptions and extracting technical skills.

Your task: Extract ONLY the concrete technical skills, tools, and technologies from the job description.

INCLUDE:
- Programming languages (Java, Python, JavaScript, etc.)
- Frameworks (Spring Boot, React, Django, etc.)
- Databases (MySQL, PostgreSQL, MongoDB, etc.)
- Tools & Technologies (Docker, Git, AWS, Kafka, etc.)
- Specific methodologies (Agile, REST API, Microservices, etc.)

EXCLUDE:
- Soft skills (communication, teamwork, problem-solving)
- General terms (computer science, software engineering)
- Years of experience
- Educational requirements
- Job responsibilities

Partition the skills into those the role mandates and those listed as
preferred, bonus, or nice to have.

Return your response in the following format:
REQUIRED: [comma-separated list of required technical skills in lowercase]
NICE_TO_HAVE: [comma-separated list of preferred technical skills in lowercase, or "none"]

DO NOT include explanations or categories, ONLY the two lines above."#;

const REQUIREMENTS_USER: &str = "Job Description:\n\n{job_description}";

const RESUME_SYSTEM: &str = r#"You are an expert HR assistant specialized in parsing resumes.
Extract the following information from the resume text:
1. Candidate name
2. All technical and professional skills (programming languages, frameworks, tools, certifications, etc.)

Return your response in the following format:
NAME: [candidate name]
SKILLS: [comma-separated list of skills, normalized to lowercase]

If the resume is empty or you cannot extract information, return:
NAME: Unknown
SKILLS: none"#;

const RESUME_USER: &str = "Resume text:\n\n{resume_text}";

const MATCHING_SYSTEM: &str = r#"You are an expert HR assistant specialized in matching skills.
Given one required skill and a candidate's skill list, decide whether the
candidate has that skill, a clear synonym, or a skill that implies it.

Consider these equivalences (and similar patterns):
- "python" matches "python programming", "python3", "python 2.7", etc.
- "javascript" matches "js", "ecmascript", but also "node.js", "react", "angular", "vue" (frameworks imply the language)
- "java" matches "java programming", "java 8", "java ee", "spring" (framework implies language)
- "machine learning" matches "ml", "deep learning", "neural networks", "tensorflow", "pytorch"
- "sql" matches "mysql", "postgresql", "rdbms", "t-sql"
- "aws" matches "amazon web services", "ec2", "s3", "lambda"
- "git" matches "github", "gitlab", "version control"
- "rest api" matches "restful", "api development", "web services"

Be reasonable but do not invent connections that do not exist.

Answer with exactly one word: YES or NO."#;

const MATCHING_USER: &str = "Required skill: {required_skill}\nCandidate skills: {candidate_skills}";
