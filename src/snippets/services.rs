use crate::{
    error::{ApiError, ApiResult},
    snippets::{
        dto::{CreateSnippetRequest, TagsInput, UpdateSnippetRequest},
        repo_types::{NewSnippet, SnippetChanges},
    },
};

/// Trims every tag and drops empty ones. Order and duplicates are kept.
pub fn normalize_tags(input: TagsInput) -> Vec<String> {
    let raw: Vec<String> = match input {
        TagsInput::List(list) => list,
        TagsInput::Delimited(s) => s.split(',').map(str::to_string).collect(),
    };
    raw.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn normalize_language(language: &str) -> String {
    language.to_uppercase()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub fn new_snippet(req: CreateSnippetRequest) -> ApiResult<NewSnippet> {
    let (Some(title), Some(code), Some(language)) = (
        non_empty(req.title),
        non_empty(req.code),
        non_empty(req.language),
    ) else {
        return Err(ApiError::Validation(
            "Title, code, and language are required".into(),
        ));
    };

    Ok(NewSnippet {
        title,
        description: non_empty(req.description),
        code,
        language: normalize_language(&language),
        tags: req.tags.map(normalize_tags).unwrap_or_default(),
        is_public: req.is_public.unwrap_or(false),
    })
}

pub fn snippet_changes(req: UpdateSnippetRequest) -> SnippetChanges {
    SnippetChanges {
        title: req.title,
        description: req.description.map(non_empty),
        code: req.code,
        language: req.language.as_deref().map(normalize_language),
        tags: req
            .tags
            .map(|t| t.map(normalize_tags).unwrap_or_default()),
        is_public: req.is_public,
    }
}
