use crate::{
    error::{GatewayError, Result},
    imaging,
    models::{GenerationMode, GenerationRequest},
};

pub const INIT_IMAGE_FIELD: &str = "init_image";
pub const INIT_IMAGE_FILE_NAME: &str = "init_image.png";
pub const INIT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl FormField {
    pub fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }

    fn text(name: &str, value: impl ToString) -> Self {
        FormField::Text {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Multipart body as plain data, before it is handed to the HTTP client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    pub fields: Vec<FormField>,
}

impl FormPayload {
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            FormField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &FormField> {
        self.fields
            .iter()
            .filter(|field| matches!(field, FormField::File { .. }))
    }
}

/// Build the multipart fields for a request, normalizing the source image in edit mode.
///
/// Normalization is CPU-bound and runs on the blocking pool.
pub async fn build_form(request: &GenerationRequest) -> Result<FormPayload> {
    let mut fields = vec![
        FormField::text("text_prompts[0][text]", request.prompt()),
        FormField::text("cfg_scale", request.cfg_scale()),
        FormField::text("steps", request.steps()),
    ];

    if let GenerationMode::Edit(source) = request.mode() {
        let source = source.clone();
        let png = tokio::task::spawn_blocking(move || imaging::normalize_source_image(&source))
            .await
            .map_err(|e| {
                log::error!("Normalization task failed: {}", e);
                GatewayError::TaskFailure(e.to_string())
            })??;
        fields.push(FormField::File {
            name: INIT_IMAGE_FIELD.to_string(),
            file_name: INIT_IMAGE_FILE_NAME.to_string(),
            mime: INIT_IMAGE_MIME.to_string(),
            bytes: png.into_inner(),
        });
    }
    if let Some(strength) = request.image_strength() {
        fields.push(FormField::text("image_strength", strength));
    }

    Ok(FormPayload { fields })
}
