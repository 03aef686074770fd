use reqwest::Request;

use crate::http::account::Credential;
use crate::http::error::ValidationError;
use crate::http::files::FileMeta;
use crate::http::{build_json_request, Error};

/// Request message for `b2_list_file_names`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFileNamesRequest {
    pub bucket_id: String,
    /// The first file name to return. Use `next_file_name` of the previous page to continue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_name: Option<String>,
    /// Maximum number of files to return. The service caps this at 1000 and defaults to 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_count: Option<u32>,
}

/// A page of file names.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFileNamesResponse {
    pub files: Vec<FileMeta>,
    /// `None` when this is the last page.
    #[serde(default, deserialize_with = "crate::http::non_empty")]
    pub next_file_name: Option<String>,
}

/// Request message for `b2_list_file_versions`.
#[derive(Clone, PartialEq, Eq, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFileVersionsRequest {
    pub bucket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_name: Option<String>,
    /// Only valid together with `start_file_name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_count: Option<u32>,
}

impl ListFileVersionsRequest {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        let has_name = self.start_file_name.as_deref().is_some_and(|n| !n.is_empty());
        let has_id = self.start_file_id.as_deref().is_some_and(|id| !id.is_empty());
        if has_id && !has_name {
            return Err(ValidationError::StartFileIdWithoutName);
        }
        Ok(())
    }
}

/// A page of file versions.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListFileVersionsResponse {
    pub files: Vec<FileMeta>,
    #[serde(default, deserialize_with = "crate::http::non_empty")]
    pub next_file_name: Option<String>,
    #[serde(default, deserialize_with = "crate::http::non_empty")]
    pub next_file_id: Option<String>,
}

pub(crate) fn build_names(credential: &Credential, req: &ListFileNamesRequest) -> Result<Request, Error> {
    build_json_request(
        "POST",
        &credential.api("b2_list_file_names"),
        req,
        Some(&credential.authorization_token),
    )
}

pub(crate) fn build_versions(credential: &Credential, req: &ListFileVersionsRequest) -> Result<Request, Error> {
    req.validate()?;
    build_json_request(
        "POST",
        &credential.api("b2_list_file_versions"),
        req,
        Some(&credential.authorization_token),
    )
}

#[cfg(test)]
mod test {
    use crate::http::error::ValidationError;
    use crate::http::files::list::{ListFileNamesResponse, ListFileVersionsRequest, ListFileVersionsResponse};
    use crate::http::files::test::file_json;
    use crate::http::files::Action;

    #[test]
    fn continuation_markers() {
        let files = [Action::Upload, Action::Hide, Action::Start]
            .into_iter()
            .enumerate()
            .map(|(i, a)| file_json(i, a))
            .collect::<Vec<_>>()
            .join(",");

        let page: ListFileVersionsResponse =
            serde_json::from_str(&format!(r#"{{"files":[{files}],"nextFileId":"id3","nextFileName":"name3"}}"#))
                .unwrap();
        assert_eq!(page.files.len(), 3);
        assert_eq!(page.next_file_name.as_deref(), Some("name3"));
        assert_eq!(page.next_file_id.as_deref(), Some("id3"));
        for (i, file) in page.files.iter().enumerate() {
            assert_eq!(file.file_id, format!("id{i}"));
            assert_eq!(file.size, 10 + i as u64);
            assert_eq!(file.upload_timestamp, 100 + i as i64);
        }

        for last in [r#"{"files":[]}"#, r#"{"files":[],"nextFileName":null}"#, r#"{"files":[],"nextFileName":""}"#] {
            let page: ListFileNamesResponse = serde_json::from_str(last).unwrap();
            assert_eq!(page.next_file_name, None);
        }
    }

    #[test]
    fn start_id_requires_name() {
        let mut req = ListFileVersionsRequest {
            bucket_id: "b".to_string(),
            start_file_id: Some("id".to_string()),
            ..Default::default()
        };
        assert_eq!(req.validate(), Err(ValidationError::StartFileIdWithoutName));
        req.start_file_name = Some("name".to_string());
        assert_eq!(req.validate(), Ok(()));
        req.start_file_id = None;
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn serialize_omits_unset_markers() {
        let req = ListFileVersionsRequest {
            bucket_id: "b".to_string(),
            max_file_count: Some(3),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"bucketId":"b","maxFileCount":3}"#);
    }
}
