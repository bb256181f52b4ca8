//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `taskdeck_core::storage`.
//! A failed `UpdateItem` condition is not an error: it is classified as
//! [`WriteOutcome::PreconditionFailed`] before any mapping happens.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use taskdeck_core::storage::RepositoryError;

use crate::storage::table::WriteOutcome;

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> RepositoryError {
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => table_not_found(),
        GetItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        GetItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        GetItemError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::Store(format!("GetItem failed: {:?}", err)),
    }
}

/// Map a PutItem SDK error to RepositoryError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
) -> RepositoryError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => table_not_found(),
        PutItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        PutItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        PutItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::Store("Item collection size limit exceeded".to_string())
        }
        PutItemError::TransactionConflictException(_) => transaction_conflict(),
        PutItemError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::Store(format!("PutItem failed: {:?}", err)),
    }
}

/// Classify an UpdateItem SDK error.
///
/// `ConditionalCheckFailedException` means the precondition did not hold and
/// becomes `Ok(WriteOutcome::PreconditionFailed)`; everything else is a fault.
pub fn classify_update_item_error<T, R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
) -> Result<WriteOutcome<T>, RepositoryError> {
    classify_update_item_service_error(err.into_service_error())
}

/// Classify an already-unwrapped UpdateItem service error.
pub fn classify_update_item_service_error<T>(
    err: UpdateItemError,
) -> Result<WriteOutcome<T>, RepositoryError> {
    match err {
        UpdateItemError::ConditionalCheckFailedException(_) => Ok(WriteOutcome::PreconditionFailed),
        UpdateItemError::ResourceNotFoundException(_) => Err(table_not_found()),
        UpdateItemError::ProvisionedThroughputExceededException(_) => Err(throughput_exceeded()),
        UpdateItemError::RequestLimitExceeded(_) => Err(request_limit_exceeded()),
        UpdateItemError::ItemCollectionSizeLimitExceededException(_) => Err(
            RepositoryError::Store("Item collection size limit exceeded".to_string()),
        ),
        UpdateItemError::TransactionConflictException(_) => Err(transaction_conflict()),
        UpdateItemError::InternalServerError(_) => Err(internal_server_error()),
        err => Err(RepositoryError::Store(format!(
            "UpdateItem failed: {:?}",
            err
        ))),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> RepositoryError {
    match err.into_service_error() {
        DeleteItemError::ResourceNotFoundException(_) => table_not_found(),
        DeleteItemError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        DeleteItemError::RequestLimitExceeded(_) => request_limit_exceeded(),
        DeleteItemError::ItemCollectionSizeLimitExceededException(_) => {
            RepositoryError::Store("Item collection size limit exceeded".to_string())
        }
        DeleteItemError::TransactionConflictException(_) => transaction_conflict(),
        DeleteItemError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::Store(format!("DeleteItem failed: {:?}", err)),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> RepositoryError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => table_not_found(),
        ScanError::ProvisionedThroughputExceededException(_) => throughput_exceeded(),
        ScanError::RequestLimitExceeded(_) => request_limit_exceeded(),
        ScanError::InternalServerError(_) => internal_server_error(),
        err => RepositoryError::Store(format!("Scan failed: {:?}", err)),
    }
}

fn table_not_found() -> RepositoryError {
    RepositoryError::Store("Table not found".to_string())
}

fn throughput_exceeded() -> RepositoryError {
    RepositoryError::Store("Throughput exceeded, please retry".to_string())
}

fn request_limit_exceeded() -> RepositoryError {
    RepositoryError::Store("Request limit exceeded, please retry".to_string())
}

fn transaction_conflict() -> RepositoryError {
    RepositoryError::Store("Transaction conflict, please retry".to_string())
}

fn internal_server_error() -> RepositoryError {
    RepositoryError::Store("DynamoDB internal server error".to_string())
}
