pub use super::answers::Entity as Answers;
pub use super::auth_tokens::Entity as AuthTokens;
pub use super::likes::Entity as Likes;
pub use super::question_tags::Entity as QuestionTags;
pub use super::questions::Entity as Questions;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
