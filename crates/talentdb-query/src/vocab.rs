//! Fixed vocabularies consulted by the query processor and the ranker.

/// Whole-token rewrites applied before punctuation is stripped.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("w/", "with"),
    ("w/o", "without"),
    ("&", "and"),
    ("exp", "experience"),
    ("dev", "developer"),
    ("devs", "developers"),
    ("eng", "engineer"),
    ("ci/cd", "ci-cd"),
    ("yoe", "years experience"),
];

pub const STOPWORDS: &[&str] = &[
    "i", "need", "want", "looking", "for", "someone", "with", "who", "has", "can", "is", "are",
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "from", "by", "about", "that",
    "this", "these", "those", "be", "been", "being", "have", "had", "do", "does", "did", "will",
    "would", "should", "could", "may", "might", "must", "project", "work",
];

pub const SKILL_SYNONYMS: &[(&str, &[&str])] = &[
    ("ml", &["machine learning", "ai", "artificial intelligence"]),
    ("js", &["javascript", "ecmascript"]),
    ("ts", &["typescript"]),
    ("py", &["python"]),
    ("react", &["reactjs", "react.js"]),
    ("node", &["nodejs", "node.js"]),
    ("db", &["database", "databases"]),
    ("api", &["rest api", "restful api", "web api"]),
    ("cloud", &["aws", "azure", "gcp", "google cloud"]),
    ("mobile", &["ios", "android", "react native", "flutter"]),
    ("data", &["data science", "data analysis", "analytics"]),
    ("backend", &["server-side", "server side"]),
    ("frontend", &["client-side", "client side", "ui", "user interface"]),
];

pub const KNOWN_SKILLS: &[&str] = &[
    "python", "javascript", "typescript", "java", "c++", "go", "rust", "php", "ruby",
    "react", "angular", "vue", "nodejs", "express", "django", "flask", "spring", "laravel",
    "html", "css", "sass", "scss", "bootstrap", "tailwind",
    "sql", "mysql", "postgresql", "mongodb", "redis", "elasticsearch",
    "aws", "azure", "gcp", "docker", "kubernetes", "jenkins", "terraform",
    "tensorflow", "pytorch", "scikit-learn", "pandas", "numpy", "opencv",
    "git", "github", "gitlab", "ci-cd", "devops", "agile", "scrum",
    "ios", "android", "react native", "flutter", "swift", "kotlin",
    "machine learning", "ai", "data science", "deep learning", "nlp", "computer vision",
    "ml", "artificial intelligence", "sklearn",
];

/// Any of these in the query pulls in both `machine learning` and `ml`.
pub const ML_ALIASES: &[&str] = &["ml", "machine learning", "ai", "artificial intelligence"];

/// Domain tag to indicator fragments. Order is the order tags are reported in.
pub const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "healthcare",
        &["healthcare", "medical", "health", "patient", "clinical", "diagnosis", "hipaa", "ehr", "emr"],
    ),
    (
        "fintech",
        &["fintech", "financial", "banking", "payment", "cryptocurrency", "blockchain", "trading"],
    ),
    (
        "ecommerce",
        &["ecommerce", "e-commerce", "retail", "shopping", "marketplace", "commerce", "store", "cart"],
    ),
    (
        "education",
        &["education", "learning", "educational", "academic", "student", "course", "training"],
    ),
    ("gaming", &["gaming", "game", "unity", "unreal", "graphics", "entertainment"]),
    ("iot", &["iot", "internet of things", "sensors", "embedded", "hardware", "device"]),
];

pub fn synonyms_of(token: &str) -> &'static [&'static str] {
    SKILL_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, expanded)| *expanded)
        .unwrap_or_default()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

pub fn is_known_skill(token: &str) -> bool {
    KNOWN_SKILLS.contains(&token)
}

pub fn domain_keywords(domain: &str) -> &'static [&'static str] {
    DOMAIN_KEYWORDS
        .iter()
        .find(|(tag, _)| *tag == domain)
        .map(|(_, kws)| *kws)
        .unwrap_or_default()
}
