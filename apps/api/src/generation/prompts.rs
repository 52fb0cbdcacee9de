// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use serde_json::{json, Value};

use crate::llm_client::prompts::{ARABIC_STYLE_RULES, IMAGE_PROMPT_PREFIX, JSON_ONLY_INSTRUCTION};
use crate::models::category::{CategoryProfile, ContentTone};

/// News draft template. Replace `{category}`, `{style}` and `{json_rule}` before sending.
pub const NEWS_PROMPT_TEMPLATE: &str = r#"ابحث عن أحدث خبر عالمي أو محلي موثوق جداً (خلال الـ 24 ساعة الماضية) لفئة: {category}.

متطلبات التحقق والصياغة المتميزة:
- التحقق: تأكد من صحة الخبر من مصادر عالمية موثوقة.
{style}
- المحتوى: تفاصيل الخبر بأسلوب رسمي، احترافي، ومختصر جداً بالفصحى.
- التاريخ: استخرج توقيت النشر الدقيق.

الحقول المطلوبة:
{"title": "...", "content": "...", "news_date": "...", "image_prompt": "وصف إنجليزي للصورة"}

{json_rule}"#;

/// Wisdom draft template. Replace `{style}` and `{json_rule}` before sending.
pub const WISDOM_PROMPT_TEMPLATE: &str = r#"اختر حكمة فلسفية عالمية أو عربية عميقة جداً ومؤثرة.

متطلبات الصياغة:
{style}
- المحتوى: الحكمة نفسها فقط بأسلوب رصين وفلسفي.
- صاحب المقولة: اسم صاحب الحكمة بشكل واضح.
- التاريخ: اليوم الحالي.

الحقول المطلوبة:
{"title": "...", "content": "...", "author": "...", "news_date": "...", "image_prompt": "وصف إنجليزي للصورة"}

{json_rule}"#;

/// Edit template. Replace `{title}`, `{content}`, `{author_line}`, `{instruction}`,
/// `{register}` and `{json_rule}` before sending.
pub const EDIT_PROMPT_TEMPLATE: &str = r#"لديك هذا النص:
العنوان الحالي: {title}
المحتوى الحالي: {content}
{author_line}
نفذ التعديل التالي بناءً على طلب المستخدم: "{instruction}"

شروط التعديل الإلزامية:
- جميع النصوص يجب أن تظل باللغة العربية الفصحى.
- العنوان (الهوك) يجب أن يظل ساخراً وكوميدياً بأسلوب ذكي.
- المحتوى يجب أن يظل {register}.
- إذا كان هناك حقل مؤلف (author)، حافظ عليه أو حدّثه إذا طلب المستخدم.
- المحتوى فقرة واحدة كاملة ومختصرة (لا تزيد عن 30 كلمة).

الحقول المطلوبة:
{"title": "...", "content": "...", "author": "..."}

{json_rule}"#;

pub fn build_draft_prompt(profile: &CategoryProfile) -> String {
    match profile.tone {
        ContentTone::News => NEWS_PROMPT_TEMPLATE.replace("{category}", profile.label),
        ContentTone::Wisdom => WISDOM_PROMPT_TEMPLATE.to_string(),
    }
    .replace("{style}", ARABIC_STYLE_RULES)
    .replace("{json_rule}", JSON_ONLY_INSTRUCTION)
}

pub fn build_edit_prompt(
    tone: ContentTone,
    title: &str,
    content: &str,
    author: Option<&str>,
    instruction: &str,
) -> String {
    let author_line = match author {
        Some(a) if !a.trim().is_empty() => format!("المؤلف الحالي: {}\n", a.trim()),
        _ => String::new(),
    };
    let register = match tone {
        ContentTone::Wisdom => "فلسفياً وعميقاً",
        ContentTone::News => "رسمياً واحترافياً",
    };
    EDIT_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{content}", content)
        .replace("{author_line}", &author_line)
        .replace("{instruction}", instruction.trim())
        .replace("{register}", register)
        .replace("{json_rule}", JSON_ONLY_INSTRUCTION)
}

pub fn build_image_prompt(profile: &CategoryProfile, subject: &str) -> String {
    format!(
        "{IMAGE_PROMPT_PREFIX} {} Subject: {}",
        profile.image_style,
        subject.trim()
    )
}

/// Response schema for ungrounded draft calls (Gemini OpenAPI subset).
pub fn draft_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "content": { "type": "STRING" },
            "author": {
                "type": "STRING",
                "description": "اسم صاحب المقولة إذا كانت حكمة، أو فارغ إذا كان خبراً"
            },
            "news_date": { "type": "STRING" },
            "image_prompt": { "type": "STRING" }
        },
        "required": ["title", "content", "news_date", "image_prompt"]
    })
}

pub fn edit_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "content": { "type": "STRING" },
            "author": { "type": "STRING" }
        },
        "required": ["title", "content"]
    })
}
