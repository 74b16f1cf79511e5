use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(CourseId);
id_newtype!(LectureId);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Not assigned yet; the backend decides on first sign-in.
    #[default]
    #[serde(rename = "")]
    Unset,
    Student,
    Educator,
}

impl Role {
    /// Unknown or missing roles read as [`Role::Unset`].
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "student" => Self::Student,
            "educator" => Self::Educator,
            _ => Self::Unset,
        }
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Role::from_wire).unwrap_or_default())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    #[serde(rename = "_id")]
    pub id: CourseId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,
}

impl EnrolledCourse {
    pub fn reference(id: CourseId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// An enrolled course as sent on the wire: the login endpoint only lists ids,
/// the current-user endpoint populates full course documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum CourseRef {
    Full(EnrolledCourse),
    Id(CourseId),
}

fn enrolled_courses<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<EnrolledCourse>, D::Error> {
    let refs: Option<Vec<CourseRef>> = Option::deserialize(deserializer)?;
    Ok(refs
        .unwrap_or_default()
        .into_iter()
        .map(|course| match course {
            CourseRef::Full(course) => course,
            CourseRef::Id(id) => EnrolledCourse::reference(id),
        })
        .collect())
}

/// Profile of the signed-in user as returned by the auth and user endpoints.
///
/// The login endpoint answers with a partial document (missing or `null`
/// fields, course ids instead of course documents); all of it decodes to
/// empty values rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", default)]
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "enrolled_courses")]
    pub enrolled_courses: Vec<EnrolledCourse>,
}

impl UserProfile {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        !self.id.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    #[serde(rename = "_id")]
    pub id: LectureId,
    #[serde(default)]
    pub lecture_title: String,
    #[serde(default)]
    pub is_preview_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}
