use std::collections::HashMap;
use tripsplit_domain::{MemberId, Trip};

/// Resolves member ids to human readable names.
pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, member_id: &MemberId) -> Option<&str>;
}

impl MemberDirectory for HashMap<MemberId, String> {
    fn display_name(&self, member_id: &MemberId) -> Option<&str> {
        self.get(member_id).map(String::as_str)
    }
}

impl MemberDirectory for Trip {
    fn display_name(&self, member_id: &MemberId) -> Option<&str> {
        self.member(member_id)
            .map(|member| member.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

pub(crate) struct EmptyMemberDirectory;

impl MemberDirectory for EmptyMemberDirectory {
    fn display_name(&self, _member_id: &MemberId) -> Option<&str> {
        None
    }
}

/// Display name, or the raw id for members the directory does not know.
pub fn member_label<'a>(member_id: &'a MemberId, directory: &'a dyn MemberDirectory) -> &'a str {
    directory
        .display_name(member_id)
        .unwrap_or(member_id.as_str())
}
