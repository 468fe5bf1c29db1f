use super::repo::DeleteResult;
use anyhow::Result;
use futures::stream::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, to_bson, Document},
    Collection,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn into_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
    fn get_id_filter(&self) -> Document;
}

fn get_id_filter(oid: &ObjectId) -> Document {
    doc! {
        "_id": oid
    }
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Document {
    let raw = D::from_domain(entity);
    doc_to_persistence(&raw)
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> Option<E> {
    match bson::from_document::<D>(doc) {
        Ok(raw) => Some(raw.into_domain()),
        Err(e) => {
            error!("Unable to deserialize document: {:?}", e);
            None
        }
    }
}

fn doc_to_persistence<E, D: MongoDocument<E>>(raw: &D) -> Document {
    to_bson(raw)
        .expect("Entity to be serializable")
        .as_document()
        .expect("Entity to serialize to a document")
        .to_owned()
}

pub async fn insert<E, D: MongoDocument<E>>(collection: &Collection, entity: &E) -> Result<()> {
    let doc = entity_to_persistence::<E, D>(entity);
    collection.insert_one(doc, None).await?;
    Ok(())
}

pub async fn bulk_insert<E, D: MongoDocument<E>>(
    collection: &Collection,
    entities: &[E],
) -> Result<()> {
    if entities.is_empty() {
        return Ok(());
    }
    let docs = entities
        .iter()
        .map(|e| entity_to_persistence::<E, D>(e))
        .collect::<Vec<_>>();
    collection.insert_many(docs, None).await?;
    Ok(())
}

pub async fn save<E, D: MongoDocument<E>>(collection: &Collection, entity: &E) -> Result<()> {
    let raw = D::from_domain(entity);
    let filter = raw.get_id_filter();
    let doc = doc_to_persistence(&raw);
    collection.replace_one(filter, doc, None).await?;
    Ok(())
}

pub async fn update_many(collection: &Collection, filter: Document, update: Document) -> Result<i64> {
    let res = collection.update_many(filter, update, None).await?;
    Ok(res.modified_count)
}

pub async fn find<E, D: MongoDocument<E>>(collection: &Collection, id: &ObjectId) -> Option<E> {
    let filter = get_id_filter(id);
    find_one_by::<E, D>(collection, filter).await
}

pub async fn find_one_by<E, D: MongoDocument<E>>(
    collection: &Collection,
    filter: Document,
) -> Option<E> {
    match collection.find_one(filter, None).await {
        Ok(Some(doc)) => persistence_to_entity::<E, D>(doc),
        Ok(None) => None,
        Err(e) => {
            error!("Error while finding document: {:?}", e);
            None
        }
    }
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection,
    filter: Document,
) -> Result<Vec<E>> {
    let mut cursor = collection.find(filter, None).await?;
    let mut documents = Vec::new();
    while let Some(doc) = cursor.next().await {
        if let Some(entity) = persistence_to_entity::<E, D>(doc?) {
            documents.push(entity);
        }
    }
    Ok(documents)
}

/// Atomically applies `update` to the first document matching `filter`
/// and returns the updated document, or `None` when nothing matched.
pub async fn find_one_and_update<E, D: MongoDocument<E>>(
    collection: &Collection,
    filter: Document,
    update: Document,
) -> Result<Option<E>> {
    let options = mongodb::options::FindOneAndUpdateOptions::builder()
        .return_document(mongodb::options::ReturnDocument::After)
        .build();
    let doc = collection.find_one_and_update(filter, update, options).await?;
    Ok(doc.and_then(persistence_to_entity::<E, D>))
}

pub async fn count(collection: &Collection, filter: Document) -> Result<i64> {
    let count = collection.count_documents(filter, None).await?;
    Ok(count)
}

pub async fn delete<E, D: MongoDocument<E>>(collection: &Collection, id: &ObjectId) -> Option<E> {
    let filter = get_id_filter(id);
    let entity = find_one_by::<E, D>(collection, filter.clone()).await?;
    if let Err(e) = collection.delete_one(filter, None).await {
        error!("Error while deleting document: {:?}", e);
        return None;
    }
    Some(entity)
}

pub async fn delete_many_by(collection: &Collection, filter: Document) -> Result<DeleteResult> {
    let res = collection.delete_many(filter, None).await?;
    Ok(DeleteResult {
        deleted_count: res.deleted_count,
    })
}
