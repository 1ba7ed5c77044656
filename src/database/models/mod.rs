pub mod comment;
pub mod community;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentWithAuthor};
pub use community::{Community, CommunityWithMembers, Member};
pub use post::{Post, PostDetail, PostSummary};
pub use user::{AuthorName, User, UserProfile};
