use crate::upload::types::{ResourceKind, UploadTarget};

pub const ADD_ROOM_FORM: &str = "addRoomForm";
pub const EDIT_ROOM_FORM: &str = "editRoomForm";
pub const EDIT_HOSTEL_DETAILS_FORM: &str = "editHostelDetailsForm";

/// Forms whose submission waits for uploads to finish.
pub const GUARDED_FORMS: [&str; 3] = [ADD_ROOM_FORM, EDIT_ROOM_FORM, EDIT_HOSTEL_DETAILS_FORM];

#[derive(Debug, Clone)]
pub struct FormLayout {
    pub form_id: String,
    pub title: String,
    pub targets: Vec<UploadTarget>,
}

fn target(
    form_id: &str,
    input_id: &str,
    resource_kind: ResourceKind,
    status_element_id: &str,
    hidden_field_id: &str,
) -> UploadTarget {
    UploadTarget {
        input_id: input_id.to_string(),
        form_id: form_id.to_string(),
        resource_kind,
        status_element_id: status_element_id.to_string(),
        hidden_field_id: hidden_field_id.to_string(),
        multiple: resource_kind == ResourceKind::Image,
    }
}

impl FormLayout {
    /// Room images and video; shared by the add and edit room forms.
    pub fn room(form_id: &str, title: &str) -> Self {
        Self {
            form_id: form_id.to_string(),
            title: title.to_string(),
            targets: vec![
                target(
                    form_id,
                    "upload_images",
                    ResourceKind::Image,
                    "image_upload_status",
                    "images_cloudinary_urls",
                ),
                target(
                    form_id,
                    "upload_video",
                    ResourceKind::Video,
                    "video_upload_status",
                    "video_cloudinary_url",
                ),
            ],
        }
    }

    pub fn hostel_details() -> Self {
        let form_id = EDIT_HOSTEL_DETAILS_FORM;
        Self {
            form_id: form_id.to_string(),
            title: "Edit Hostel Details".to_string(),
            targets: vec![
                target(
                    form_id,
                    "upload_general_images",
                    ResourceKind::Image,
                    "general_image_upload_status",
                    "general_images_cloudinary_urls",
                ),
                target(
                    form_id,
                    "upload_general_video",
                    ResourceKind::Video,
                    "general_video_upload_status",
                    "general_video_cloudinary_url",
                ),
            ],
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![
            Self::room(ADD_ROOM_FORM, "Add Room"),
            Self::room(EDIT_ROOM_FORM, "Edit Room"),
            Self::hostel_details(),
        ]
    }
}

/// Reads a newline-delimited URL list back, skipping blank lines.
pub fn parse_url_list(value: &str) -> Vec<String> {
    value
        .split('\n')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}
