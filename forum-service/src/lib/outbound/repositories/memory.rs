use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::like::errors::LikeError;
use crate::domain::like::models::PostLike;
use crate::domain::like::ports::LikeRepository;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::NewPost;
use crate::domain::post::models::Post;
use crate::domain::post::models::PostId;
use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    posts: BTreeMap<PostId, Post>,
    likes: HashMap<(UserId, PostId), PostLike>,
    last_post_id: i64,
}

/// Process-local record store implementing every repository port.
///
/// One lock guards all tables, so each repository call is atomic with
/// respect to every other: the like relation and its counter always change
/// under the same write guard. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.username == user.username) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| &u.username == username)
            .cloned())
    }

    async fn update_password_hash(
        &self,
        id: &UserId,
        password_hash: String,
    ) -> Result<(), UserError> {
        let mut state = self.state.write().await;

        let user = state
            .users
            .get_mut(id)
            .ok_or(UserError::NotFound(id.to_string()))?;
        user.password_hash = password_hash;

        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: NewPost) -> Result<Post, PostError> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&post.author_id) {
            return Err(PostError::AuthorNotFound(post.author_id));
        }

        state.last_post_id += 1;
        let post = Post {
            id: PostId(state.last_post_id),
            author_id: post.author_id,
            author: post.author,
            section: post.section,
            title: post.title,
            content: post.content,
            likes: 0,
            created_at: post.created_at,
        };
        state.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostError> {
        Ok(self.state.read().await.posts.get(&id).cloned())
    }

    async fn list(&self, section: Option<String>) -> Result<Vec<Post>, PostError> {
        let state = self.state.read().await;

        let mut posts: Vec<Post> = state
            .posts
            .values()
            .filter(|post| section.as_ref().map_or(true, |s| &post.section == s))
            .cloned()
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));

        Ok(posts)
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn like_count(&self, post_id: PostId) -> Result<Option<u64>, LikeError> {
        Ok(self
            .state
            .read()
            .await
            .posts
            .get(&post_id)
            .map(|post| post.likes))
    }

    async fn exists(&self, user_id: UserId, post_id: PostId) -> Result<bool, LikeError> {
        Ok(self
            .state
            .read()
            .await
            .likes
            .contains_key(&(user_id, post_id)))
    }

    async fn liked_post_ids(
        &self,
        user_id: UserId,
        post_ids: &[PostId],
    ) -> Result<HashSet<PostId>, LikeError> {
        let state = self.state.read().await;

        Ok(post_ids
            .iter()
            .copied()
            .filter(|post_id| state.likes.contains_key(&(user_id, *post_id)))
            .collect())
    }

    async fn insert(&self, like: PostLike) -> Result<u64, LikeError> {
        let mut state = self.state.write().await;
        let key = (like.user_id, like.post_id);

        if !state.posts.contains_key(&like.post_id) {
            return Err(LikeError::PostNotFound(like.post_id));
        }
        if state.likes.contains_key(&key) {
            return Err(LikeError::AlreadyLiked {
                user_id: like.user_id,
                post_id: like.post_id,
            });
        }

        state.likes.insert(key, like);
        let post = state
            .posts
            .get_mut(&key.1)
            .ok_or(LikeError::PostNotFound(key.1))?;
        post.likes += 1;

        Ok(post.likes)
    }

    async fn delete(&self, user_id: UserId, post_id: PostId) -> Result<Option<u64>, LikeError> {
        let mut state = self.state.write().await;

        if state.likes.remove(&(user_id, post_id)).is_none() {
            return Ok(None);
        }

        let post = state
            .posts
            .get_mut(&post_id)
            .ok_or(LikeError::PostNotFound(post_id))?;
        post.likes = post.likes.saturating_sub(1);

        Ok(Some(post.likes))
    }
}
