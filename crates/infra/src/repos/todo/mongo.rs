use super::ITodoRepo;
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use klubb_domain::{Todo, TodoStatus, ID};
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Document},
    Collection, Database,
};
use serde::{Deserialize, Serialize};

pub struct MongoTodoRepo {
    collection: Collection,
}

impl MongoTodoRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("todos"),
        }
    }
}

#[async_trait::async_trait]
impl ITodoRepo for MongoTodoRepo {
    async fn insert(&self, todo: &Todo) -> anyhow::Result<()> {
        mongo_repo::insert::<_, TodoMongo>(&self.collection, todo).await
    }

    async fn save(&self, todo: &Todo) -> anyhow::Result<()> {
        mongo_repo::save::<_, TodoMongo>(&self.collection, todo).await
    }

    async fn find(&self, todo_id: &ID) -> Option<Todo> {
        mongo_repo::find::<_, TodoMongo>(&self.collection, todo_id.inner_ref()).await
    }

    async fn find_for_user(
        &self,
        user_id: &ID,
        status: Option<TodoStatus>,
    ) -> anyhow::Result<Vec<Todo>> {
        let mut filter = doc! {
            "$or": [
                { "owner_id": user_id.inner_ref() },
                { "assignee_id": user_id.inner_ref() }
            ]
        };
        if let Some(status) = status {
            filter.insert("status", to_bson(&status)?);
        }
        mongo_repo::find_many_by::<_, TodoMongo>(&self.collection, filter).await
    }

    async fn delete(&self, todo_id: &ID) -> Option<Todo> {
        mongo_repo::delete::<_, TodoMongo>(&self.collection, todo_id.inner_ref()).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TodoMongo {
    pub _id: ObjectId,
    pub owner_id: ObjectId,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub due_ts: Option<i64>,
    pub completed_at: Option<i64>,
    pub assignee_id: Option<ObjectId>,
    pub created: i64,
    pub updated: i64,
}

impl MongoDocument<Todo> for TodoMongo {
    fn into_domain(self) -> Todo {
        Todo {
            id: ID::from(self._id),
            owner_id: ID::from(self.owner_id),
            title: self.title,
            description: self.description,
            status: self.status,
            due_ts: self.due_ts,
            completed_at: self.completed_at,
            assignee_id: self.assignee_id.map(ID::from),
            created: self.created,
            updated: self.updated,
        }
    }

    fn from_domain(todo: &Todo) -> Self {
        Self {
            _id: todo.id.clone().inner(),
            owner_id: todo.owner_id.clone().inner(),
            title: todo.title.clone(),
            description: todo.description.clone(),
            status: todo.status,
            due_ts: todo.due_ts,
            completed_at: todo.completed_at,
            assignee_id: todo.assignee_id.clone().map(|id| id.inner()),
            created: todo.created,
            updated: todo.updated,
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id.clone()
        }
    }
}
