// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Appended to every text prompt. Grounded calls cannot use JSON response
/// mode, so the shape is spelled out in the prompt as well.
pub const JSON_ONLY_INSTRUCTION: &str = "\
أعد النتيجة بصيغة JSON فقط: كائن واحد بدون أي نص قبله أو بعده وبدون علامات markdown.";

/// House style shared by drafts and edits.
pub const ARABIC_STYLE_RULES: &str = "\
- اللغة: جميع النصوص باللغة العربية الفصحى.
- العنوان (الهوك): بأسلوب ساخر، فكاهي، ومثير بالفصحى (لا يتجاوز 6 كلمات).
- التفاصيل: فقرة واحدة قصيرة (بين 15 إلى 30 كلمة فقط) مكتملة المعنى بدون أي بتر أو جمل ناقصة.";

/// Prefix for every background prompt. Backgrounds never carry text.
pub const IMAGE_PROMPT_PREFIX: &str = "High-impact 8k cinematic masterpiece, vertical 9:16 aspect ratio, \
dramatic realistic lighting, no text, photorealistic.";
