//! Shared constants/setters for things
//!

/// VQA model used to describe the uploaded image.
pub const DEFAULT_ANALYSIS_API_URL: &str =
    "https://api-inference.huggingface.co/models/dandelin/vilt-b32-finetuned-vqa";

/// Image model used to render the composed prompt.
pub const DEFAULT_GENERATION_API_URL: &str =
    "https://api-inference.huggingface.co/models/thejagstudio/3d-animation-style-sdxl";

/// Value stored for an attribute when the remote model couldn't answer.
pub const PLACEHOLDER_ATTRIBUTE: &str = "unspecified";

/// File name offered when downloading the generated image.
pub const GENERATED_IMAGE_FILENAME: &str = "generated_image.png";

/// Where feedback is appended unless configured otherwise.
pub const DEFAULT_FEEDBACK_PATH: &str = "feedback.txt";

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Sessions are dropped after this many seconds without a request.
pub const SESSION_INACTIVITY_SECONDS: i64 = 60 * 60;

/// Cache-Control value for per-session image responses.
pub const IMAGE_CACHE_CONTROL: &str = "private, no-store";

/// Length of CSRF session tokens
pub const CSRF_TOKEN_LENGTH: usize = 32;

/// Upper bound on the summed size of stored session data, in bytes.
pub const SESSION_CACHE_BYTES: u64 = 512 * 1024 * 1024;
