//! Prompt template constants.
//!
//! All five task templates are fixed strings rendered with Handlebars.
//! Each instructs the backend to return only the structured payload; any
//! prose wrapper breaks the downstream parsers.

/// Question answering over retrieved context and chat history.
pub const QA_TEMPLATE: &str = "\
You are an expert teaching assistant. Use the RETRIEVED CONTEXT and the CHAT HISTORY to answer the QUESTION objectively and concisely.

RETRIEVED CONTEXT:
{{context}}

CHAT HISTORY:
{{history}}

QUESTION:
{{question}}

INSTRUCTIONS:
- Answer using only the information in the retrieved context when possible. If the answer is not present, say you don't know and point to where it might be found.
- Be concise (1-3 paragraphs) and cite documents inline like [Doc <id>] where relevant.
- End with a short confidence estimate (low/medium/high).
";

/// Extractive summary: a JSON array of exactly N short strings.
pub const EXTRACTIVE_TEMPLATE: &str = "\
Extract the {{sentences}} most important sentences or bullet points from the following lecture text.

Text:
{{text}}

Return the result as a JSON array of short strings, for example: [\"Sentence 1\", \"Sentence 2\"].
The output must be a valid JSON array. No extra commentary.
";

/// Table of contents: a JSON array of {title, hint} objects.
pub const TOC_TEMPLATE: &str = "\
Produce a table of contents with up to {{max_level}} levels for the following text.

Text:
{{text}}

Return the result as a JSON array of objects with keys \"title\" and \"hint\" (hint: a 1-2 sentence summary), for example: [{\"title\": \"Title 1\", \"hint\": \"Summary of title 1\"}].
The output must be a valid JSON array. No extra commentary.
";

/// Abstractive summary over key points, TOC and a mandatory editor note.
pub const ABSTRACTIVE_TEMPLATE: &str = "\
Using the following key points and table of contents, write a {{style}} narrative summary suitable for a student study guide. Include brief examples where helpful and keep the summary well-structured with paragraphs that follow the table of contents.

Key points:
{{key_points}}

YOU MUST FOLLOW THE EDITOR NOTE: {{editor_note}}

Table of contents:
{{toc}}

Provide the final summary only.
";

/// Multiple-choice question generation.
pub const MCQ_TEMPLATE: &str = "\
You are an educational question generator. From the provided text, create:
- {{count}} multiple-choice questions (4 options each), with one correct option and a short rationale.
Return the result as a JSON object: {\"Question\": [{\"question\": \"...\", \"options\": [\"...\"], \"answer_index\": 0, \"rationale\": \"...\"}]}

Text:
{{text}}

Keep questions at a difficulty roughly matching the requested level (1-5).
{{rubric}}
Difficulty level: {{difficulty}}
Do not include any explanations, markdown, or text outside the JSON.
";

/// True/False question generation.
pub const TF_TEMPLATE: &str = "\
You are an educational question generator. From the provided text, create:
- {{count}} True/False questions with the correct boolean and a short rationale.
Return the result as a JSON object: {\"Question\": [{\"question\": \"...\", \"answer\": true, \"rationale\": \"...\"}]}

Text:
{{text}}

Keep questions at a difficulty roughly matching the requested level (1-5).
{{rubric}}
Difficulty level: {{difficulty}}
Do not include any explanations, markdown, or text outside the JSON.
";

/// Difficulty rubric embedded verbatim in every question-generation call.
pub const DIFFICULTY_RUBRIC: &str = "\
Difficulty level 1: Basic concepts, definitions, and explanations.
Difficulty level 2: Intermediate concepts, applications, and examples.
Difficulty level 3: Advanced concepts, theorems, and proofs.
Difficulty level 4: Highly specialized concepts, theories, and applications.
Difficulty level 5: Expert-level concepts, research-level topics, and complex problems.";
