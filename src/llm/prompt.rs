//! Prompt construction for translation requests.
//!
//! The translator sends a single prompt: every instructional context block in
//! order, each separated by a newline, followed by the question on the last
//! line. Blocks mention the review table through a `{table}` placeholder so a
//! renamed table keeps the few-shot examples consistent.

/// Placeholder replaced with the configured table name.
const TABLE_PLACEHOLDER: &str = "{table}";

/// Schema description with column semantics and the `asin` exclusion rule.
const SCHEMA_BLOCK: &str = r#"You are an expert in converting natural language questions into SQL queries for a SQLite database. The table is named `{table}` and contains the following columns:
- reviewerID: ID of the reviewer.
- reviewerName: Name of the reviewer.
- helpful: Number of helpful votes for the review.
- reviewText: The content of the review.
- overall: Rating of the item (1-5 scale).
- summary: Summary of the review.
- unixReviewTime: Review timestamp in UNIX format.
- reviewTime: Review timestamp in human-readable format.
- day_diff: Number of days since the review.
- helpful_yes: Number of helpful votes marked as "yes".
- total_vote: Total votes for the review.

Important: the `asin` column holds the same value in every row and must not be included in any SQL query.

Convert the question into a SQL query that only involves the relevant columns (never `asin`) and returns only the necessary results.

Examples:
- Question: "How many reviews of item X are present?"
- SQL Query: "SELECT COUNT(*) FROM {table};"

- Question: "Give me the latest negative reviews."
- SQL Query: "SELECT reviewText FROM {table} WHERE overall < 4 ORDER BY unixReviewTime DESC;"

Generate the SQL query only, without any additional text. If the question does not correspond to a valid query, respond with "Invalid query.""#;

/// Sentiment-labeling example.
const SENTIMENT_BLOCK: &str = r#"You are an expert in sentiment analysis. Given a review, determine if it's positive, neutral, or negative.
For example:
- "Great product, would buy again!" - Positive
- "Not bad, but could be better." - Neutral
- "Terrible experience, do not buy!" - Negative

Output only the sentiment (Positive/Neutral/Negative) without any additional text."#;

/// General query-assistant framing.
const ASSISTANT_BLOCK: &str = r#"You are a chatbot that understands various types of database queries and helps users retrieve meaningful information from large datasets like reviews. Translate the user's query into SQL for the `{table}` table.

Make sure the SQL query is valid and only uses the available columns of the `{table}` table. The `asin` column must not appear in the SQL query."#;

/// Literal natural-language to SQL example pairs.
const EXAMPLE_PAIRS: &[(&str, &str)] = &[
    ("How many reviews does product X have?", "SELECT COUNT(*) FROM {table};"),
    ("Give me all the reviews with a rating of 5.", "SELECT reviewText FROM {table} WHERE overall = 5;"),
    ("What is the average rating for product Z?", "SELECT AVG(overall) FROM {table};"),
    ("Retrieve the latest review.", "SELECT reviewText FROM {table} ORDER BY unixReviewTime DESC LIMIT 1;"),
    ("Which reviewer has submitted the most reviews?", "SELECT reviewerName, COUNT(*) as num_reviews FROM {table} GROUP BY reviewerName ORDER BY num_reviews DESC LIMIT 1;"),
    ("Find all reviews that contain the word 'bad'.", "SELECT reviewText FROM {table} WHERE reviewText LIKE '%bad%';"),
    ("Give me the reviews with a rating lower than 3.", "SELECT reviewText FROM {table} WHERE overall < 3;"),
    ("How many helpful votes did the review with the highest rating receive?", "SELECT helpful_yes FROM {table} WHERE overall = (SELECT MAX(overall) FROM {table});"),
    ("Which product has the most reviews?", "SELECT asin, COUNT(*) as num_reviews FROM {table} GROUP BY asin ORDER BY num_reviews DESC LIMIT 1;"),
    ("Find all reviews posted within the last week.", "SELECT reviewText FROM {table} WHERE unixReviewTime >= strftime('%s', 'now') - 604800;"),
    ("Find all products where the average rating is below 3.5.", "SELECT asin FROM (SELECT asin, AVG(overall) as avg_rating FROM {table} GROUP BY asin) WHERE avg_rating < 3.5;"),
    ("List the top 5 most helpful reviews.", "SELECT reviewText FROM {table} ORDER BY helpful_yes DESC LIMIT 5;"),
    ("Which user has written the highest number of positive reviews?", "SELECT reviewerName, COUNT(*) as num_reviews FROM {table} WHERE overall >= 4 GROUP BY reviewerName ORDER BY num_reviews DESC LIMIT 1;"),
    ("Find all reviews that contain the word 'amazing'.", "SELECT reviewText FROM {table} WHERE reviewText LIKE '%amazing%';"),
    ("Give me the top 3 most recent negative reviews.", "SELECT reviewText FROM {table} WHERE overall < 4 ORDER BY unixReviewTime DESC LIMIT 3;"),
    ("Which product has the longest average review text?", "SELECT asin FROM (SELECT asin, AVG(LENGTH(reviewText)) as avg_length FROM {table} GROUP BY asin) WHERE avg_length = (SELECT MAX(avg_length) FROM (SELECT asin, AVG(LENGTH(reviewText)) as avg_length FROM {table} GROUP BY asin));"),
    ("How many reviews have no helpful votes?", "SELECT COUNT(*) FROM {table} WHERE helpful_yes = 0;"),
    ("Find all reviews with no text content.", "SELECT reviewText FROM {table} WHERE reviewText = '';"),
    ("Which reviewers tend to give the lowest ratings?", "SELECT reviewerName, AVG(overall) as avg_rating FROM {table} GROUP BY reviewerName ORDER BY avg_rating ASC LIMIT 1;"),
    ("List all reviews that have a rating of 3 and contain the word 'average'.", "SELECT reviewText FROM {table} WHERE overall = 3 AND reviewText LIKE '%average%';"),
    ("What is the total number of votes received by reviews?", "SELECT SUM(total_vote) FROM {table};"),
    ("Which reviewer has the highest total votes?", "SELECT reviewerName, SUM(total_vote) as total_votes FROM {table} GROUP BY reviewerName ORDER BY total_votes DESC LIMIT 1;"),
    ("Find reviews with the word 'Samsung'.", "SELECT reviewText FROM {table} WHERE reviewText LIKE '%Samsung%';"),
];

/// Ordered instructional context sent ahead of every question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    blocks: Vec<String>,
}

impl PromptContext {
    /// Builds the built-in review context for the given table name.
    pub fn for_table(table: &str) -> Self {
        let mut blocks = vec![
            SCHEMA_BLOCK.replace(TABLE_PLACEHOLDER, table),
            SENTIMENT_BLOCK.to_string(),
            ASSISTANT_BLOCK.replace(TABLE_PLACEHOLDER, table),
        ];
        blocks.extend(EXAMPLE_PAIRS.iter().map(|(question, sql)| {
            format!(
                "Input: \"{}\"\nOutput: \"{}\"",
                question,
                sql.replace(TABLE_PLACEHOLDER, table)
            )
        }));
        Self { blocks }
    }

    /// Builds a context from arbitrary blocks, kept in the given order.
    pub fn from_blocks(blocks: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            blocks: blocks.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the context blocks in order.
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Number of literal question/SQL pairs in the built-in context.
    pub fn builtin_example_count() -> usize {
        EXAMPLE_PAIRS.len()
    }
}

/// Concatenates the context blocks and the question into a single prompt.
///
/// Blocks are joined by newlines in list order; the question comes last,
/// after one more newline.
pub fn build_prompt(context: &PromptContext, question: &str) -> String {
    let mut prompt = context.blocks().join("\n");
    prompt.push('\n');
    prompt.push_str(question);
    prompt
}
