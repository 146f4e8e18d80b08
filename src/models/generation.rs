use std::fmt;

pub const IMAGE_STRENGTH: f32 = 0.35;
pub const CFG_SCALE: u32 = 7;
pub const STEPS: u32 = 30;

/// Raw encoded image bytes (PNG, JPEG, ...).
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBytes(Vec<u8>);

impl ImageBytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for ImageBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ImageBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Image payloads are large; only the size is useful in logs.
impl fmt::Debug for ImageBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageBytes({} bytes)", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationMode {
    Generate,
    Edit(ImageBytes),
}

impl GenerationMode {
    pub fn path_segment(&self) -> &'static str {
        match self {
            GenerationMode::Generate => "text-to-image",
            GenerationMode::Edit(_) => "image-to-image",
        }
    }

    pub fn source_image(&self) -> Option<&ImageBytes> {
        match self {
            GenerationMode::Generate => None,
            GenerationMode::Edit(image) => Some(image),
        }
    }
}

impl From<Option<ImageBytes>> for GenerationMode {
    fn from(source: Option<ImageBytes>) -> Self {
        match source {
            Some(image) => GenerationMode::Edit(image),
            None => GenerationMode::Generate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    prompt: String,
    mode: GenerationMode,
}

impl GenerationRequest {
    pub fn generate(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            mode: GenerationMode::Generate,
        }
    }

    pub fn edit(prompt: impl Into<String>, source_image: ImageBytes) -> Self {
        Self {
            prompt: prompt.into(),
            mode: GenerationMode::Edit(source_image),
        }
    }

    pub fn new(prompt: impl Into<String>, source_image: Option<ImageBytes>) -> Self {
        Self {
            prompt: prompt.into(),
            mode: source_image.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn mode(&self) -> &GenerationMode {
        &self.mode
    }

    pub fn cfg_scale(&self) -> u32 {
        CFG_SCALE
    }

    pub fn steps(&self) -> u32 {
        STEPS
    }

    /// Only edits carry a strength.
    pub fn image_strength(&self) -> Option<f32> {
        match self.mode {
            GenerationMode::Generate => None,
            GenerationMode::Edit(_) => Some(IMAGE_STRENGTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_optional_source() {
        let request = GenerationRequest::new("A fantasy castle", None);
        assert_eq!(request.mode(), &GenerationMode::Generate);
        assert_eq!(request.image_strength(), None);

        let source = ImageBytes::new(vec![1, 2, 3]);
        let request = GenerationRequest::new("wearing a red dress", Some(source));
        assert_eq!(request.mode().path_segment(), "image-to-image");
        assert_eq!(request.image_strength(), Some(0.35));
        assert_eq!(request.mode().source_image().map(|i| i.len()), Some(3));
    }

    #[test]
    fn test_fixed_hyperparameters() {
        let request = GenerationRequest::generate("A fantasy castle");
        assert_eq!(request.cfg_scale(), 7);
        assert_eq!(request.steps(), 30);
    }

    #[test]
    fn test_image_bytes_debug_hides_payload() {
        let image = ImageBytes::new(vec![0u8; 2048]);
        assert_eq!(format!("{:?}", image), "ImageBytes(2048 bytes)");
    }
}
