use utoipa::OpenApi;

use chomp_types::{
    ClassData, ClassSummary, MessageData, NewClassData, NewMessageData, NewThreadData, ThreadData,
    UserProfile, Vote, VoteTarget,
};

use crate::error::ErrorBody;
use crate::routes::{
    classes, classroom, health, messages, threads, users,
    votes::{self, CastVotesRequest},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Chomp API", description = "Classroom Q&A forum"),
    paths(
        health::health_check,
        users::register_user,
        classes::create_class,
        threads::create_thread,
        threads::resolve_thread,
        messages::create_message,
        votes::cast_thread_votes,
        votes::cast_message_votes,
        classroom::fetch_classroom_classes,
    ),
    components(schemas(
        ErrorBody,
        health::HealthResponse,
        users::RegisterUserRequest,
        threads::ResolveThreadRequest,
        classroom::FetchClassroomRequest,
        CastVotesRequest,
        UserProfile,
        ClassSummary,
        NewClassData,
        ClassData,
        NewThreadData,
        ThreadData,
        NewMessageData,
        MessageData,
        Vote,
        VoteTarget,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "users", description = "Profiles"),
        (name = "classes", description = "Classes and rosters"),
        (name = "threads", description = "Questions"),
        (name = "messages", description = "Replies"),
        (name = "votes", description = "Per-user vote lists"),
        (name = "classroom", description = "Google Classroom import"),
    )
)]
pub struct ApiDoc;
