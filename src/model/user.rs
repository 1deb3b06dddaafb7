use crate::framework::{FileUpload, MultipartForm};
use serde::{Deserialize, Serialize};

/// The signed-in account, as returned by `/users/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub birthday: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Body of a profile update. Every text field is always sent; the image only when picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub contact_number: String,
    pub birthday: String,
    pub bio: String,
    pub profile_image: Option<FileUpload>,
}

impl ProfileUpdate {
    /// Starts from the current profile, missing values as empty strings.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            address: user.address.clone().unwrap_or_default(),
            contact_number: user.contact_number.clone().unwrap_or_default(),
            birthday: user.birthday.clone().unwrap_or_default(),
            bio: user.bio.clone().unwrap_or_default(),
            profile_image: None,
        }
    }

    pub fn to_multipart(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("first_name", &self.first_name)
            .text("last_name", &self.last_name)
            .text("email", &self.email)
            .text("address", &self.address)
            .text("contact_number", &self.contact_number)
            .text("birthday", &self.birthday)
            .text("bio", &self.bio);

        match &self.profile_image {
            Some(image) => form.file("profile_image", image.clone()),
            None => form,
        }
    }
}
