use serde_json::Value;

use crate::error::FieldError;

/// ContentKind
///
/// The closed set of versioned content sections. Each kind owns one
/// database table and follows the same lifecycle: POST retires every
/// existing version and inserts a new active one, PUT patches a version
/// in place by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Hero,
    Struktur,
    ProgramKerja,
    Kegiatan,
    Ekskul,
}

/// ArrayRule
///
/// A required array field, with the string keys each object element must
/// carry (empty for arrays of plain strings).
pub struct ArrayRule {
    pub field: &'static str,
    pub element_strings: &'static [&'static str],
}

/// ValidationRules
///
/// The declarative required-field contract of one content kind. The
/// document body is otherwise opaque: extra fields pass through to
/// storage unmodified.
pub struct ValidationRules {
    pub required_strings: &'static [&'static str],
    pub required_arrays: &'static [ArrayRule],
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::Hero,
        ContentKind::Struktur,
        ContentKind::ProgramKerja,
        ContentKind::Kegiatan,
        ContentKind::Ekskul,
    ];

    /// Database table backing this kind.
    pub fn table(self) -> &'static str {
        match self {
            ContentKind::Hero => "hero_sections",
            ContentKind::Struktur => "struktur_sections",
            ContentKind::ProgramKerja => "program_kerja",
            ContentKind::Kegiatan => "kegiatan",
            ContentKind::Ekskul => "ekskul",
        }
    }

    /// JSON envelope key used by the REST responses for this kind.
    pub fn response_key(self) -> &'static str {
        match self {
            ContentKind::Hero => "heroSection",
            ContentKind::Struktur => "struktur",
            ContentKind::ProgramKerja => "programKerja",
            ContentKind::Kegiatan => "kegiatan",
            ContentKind::Ekskul => "ekskul",
        }
    }

    /// Human-readable name used in response messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ContentKind::Hero => "Hero section",
            ContentKind::Struktur => "Struktur",
            ContentKind::ProgramKerja => "Program kerja",
            ContentKind::Kegiatan => "Kegiatan",
            ContentKind::Ekskul => "Ekskul",
        }
    }

    /// Required-field contract, mirroring what the admin forms collect.
    pub fn rules(self) -> ValidationRules {
        match self {
            ContentKind::Hero => ValidationRules {
                required_strings: &[
                    "HeroWelcomeText",
                    "HeroPrimaryText",
                    "HeroSecondaryText",
                    "HeroDescription",
                ],
                required_arrays: &[],
            },
            ContentKind::Struktur => ValidationRules {
                required_strings: &["Judul", "JudulDeskripsi", "TahunKepengurusan"],
                // Plain member-name strings, no element shape to check.
                required_arrays: &[ArrayRule {
                    field: "members",
                    element_strings: &[],
                }],
            },
            ContentKind::ProgramKerja => ValidationRules {
                required_strings: &["ProgramKerjaJudul", "ProgramKerjaDeskripsi"],
                required_arrays: &[ArrayRule {
                    field: "programs",
                    element_strings: &["title", "description"],
                }],
            },
            ContentKind::Kegiatan => ValidationRules {
                required_strings: &["KegiatanJudul", "KegiatanDeskripsi"],
                required_arrays: &[ArrayRule {
                    field: "KegiatanSlide",
                    element_strings: &["title", "description", "image"],
                }],
            },
            ContentKind::Ekskul => ValidationRules {
                required_strings: &["EkskulJudul", "EkskulDeskripsi"],
                required_arrays: &[ArrayRule {
                    field: "EkskulSlide",
                    element_strings: &["title", "description", "image"],
                }],
            },
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => true,
    }
}

/// validate
///
/// Checks a content document against its kind's declarative rules and
/// returns every failure at once, so the admin form can highlight all
/// offending fields in a single round trip. An empty result means the
/// document may be persisted as-is.
pub fn validate(kind: ContentKind, data: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let Some(object) = data.as_object() else {
        errors.push(FieldError::new("body", "Request body must be a JSON object"));
        return errors;
    };

    let rules = kind.rules();

    for field in rules.required_strings {
        if is_blank(object.get(*field)) {
            errors.push(FieldError::required(*field));
        }
    }

    for rule in rules.required_arrays {
        match object.get(rule.field) {
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    // Element shape is only checked for slide-like objects.
                    if rule.element_strings.is_empty() {
                        continue;
                    }
                    let element = item.as_object();
                    for key in rule.element_strings {
                        let missing = match element {
                            Some(map) => is_blank(map.get(*key)),
                            None => true,
                        };
                        if missing {
                            errors.push(FieldError::required(format!(
                                "{}[{}].{}",
                                rule.field, index, key
                            )));
                        }
                    }
                }
            }
            _ => errors.push(FieldError::new(
                rule.field,
                format!("{} must be an array", rule.field),
            )),
        }
    }

    errors
}
