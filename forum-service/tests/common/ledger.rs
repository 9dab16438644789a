//! Ledger scenarios shared by every storage backend.

use std::sync::Arc;

use chrono::Utc;
use forum_service::domain::like::errors::LikeError;
use forum_service::domain::like::ports::LikeRepository;
use forum_service::domain::like::ports::LikeServicePort;
use forum_service::domain::like::service::LikeService;
use forum_service::domain::post::models::NewPost;
use forum_service::domain::post::models::PostId;
use forum_service::domain::post::ports::PostRepository;
use forum_service::domain::user::models::EmailAddress;
use forum_service::domain::user::models::User;
use forum_service::domain::user::models::UserId;
use forum_service::domain::user::models::Username;
use forum_service::domain::user::ports::UserRepository;

/// Store a fresh user with a placeholder hash.
pub async fn seed_user<U: UserRepository>(users: &U, username: &str) -> User {
    let user = User {
        id: UserId::new(),
        username: Username::new(username.to_string()).unwrap(),
        email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2VlZA$c2VlZA".to_string(),
        email_verified: true,
        created_at: Utc::now(),
    };
    users.create(user).await.unwrap()
}

/// Store a post written by `author`.
pub async fn seed_post<P: PostRepository>(posts: &P, author: &User, section: &str) -> PostId {
    posts
        .create(NewPost {
            author_id: author.id,
            author: author.username.as_str().to_string(),
            section: section.to_string(),
            title: "Contended".to_string(),
            content: "Like me".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap()
        .id
}

pub async fn distinct_users_count_exactly<R>(service: Arc<LikeService<R>>, post_id: PostId, users: usize)
where
    R: LikeRepository + 'static,
{
    let users: Vec<UserId> = (0..users).map(|_| UserId::new()).collect();
    let handles: Vec<_> = users
        .iter()
        .map(|&user_id| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.toggle(user_id, post_id).await })
        })
        .collect();

    for handle in handles {
        let status = handle.await.unwrap().unwrap();
        assert!(status.liked);
    }

    let guest = service.status(None, post_id).await.unwrap();
    assert_eq!(guest.count, users.len() as u64);
    assert!(!guest.liked);

    for user_id in users {
        assert!(service.status(Some(user_id), post_id).await.unwrap().liked);
    }
}

pub async fn same_user_toggles_keep_one_relation<R>(
    store: Arc<R>,
    service: Arc<LikeService<R>>,
    post_id: PostId,
    toggles: usize,
) where
    R: LikeRepository + 'static,
{
    let user_id = UserId::new();

    let observer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for _ in 0..200 {
                let count = store.like_count(post_id).await.unwrap().unwrap();
                assert!(count <= 1, "observed {} likes from one user", count);
                tokio::task::yield_now().await;
            }
        })
    };

    let handles: Vec<_> = (0..toggles)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.toggle(user_id, post_id).await })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(status) => {
                assert!(status.count <= 1);
                assert_eq!(status.count, status.liked as u64);
                applied += 1;
            }
            Err(LikeError::Contention(id)) => assert_eq!(id, post_id),
            Err(e) => panic!("unexpected error: {}", e),
        }
    }
    observer.await.unwrap();

    let liked = store.exists(user_id, post_id).await.unwrap();
    let count = store.like_count(post_id).await.unwrap().unwrap();

    assert_eq!(liked, applied % 2 == 1);
    assert_eq!(count, liked as u64);
}
