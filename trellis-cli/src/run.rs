//! Dispatch parsed commands to board operations

use crate::cli::{BoardAction, CardAction, ColumnAction, Commands};
use serde_json::{json, Value};
use trellis_board::{
    board::{CreateBoard, DeleteBoard, GetBoard, ListBoards, UpdateBoard},
    card::{AddCard, DeleteCard, MoveCard, UpdateCard},
    column::{AddColumn, DeleteColumn, MoveColumn, UpdateColumn},
    BoardContext, BoardError, BoardOperationProcessor, Operation, OperationProcessor,
};

/// Run one command through the logging processor
pub async fn run(command: Commands, ctx: &BoardContext) -> Result<Value, BoardError> {
    let processor = BoardOperationProcessor::new();

    match command {
        Commands::Board { action } => match action {
            BoardAction::Create { name, color } => {
                processor.process(&CreateBoard::new(name, color), ctx).await
            }
            BoardAction::List => processor.process(&ListBoards::new(), ctx).await,
            BoardAction::Show { id } => processor.process(&GetBoard::new(id), ctx).await,
            BoardAction::Update { id, name, color } => {
                let mut op = UpdateBoard::new(id);
                op.name = name;
                op.color = color;
                processor.process(&op, ctx).await
            }
            BoardAction::Delete { id } => processor.process(&DeleteBoard::new(id), ctx).await,
        },

        Commands::Column { action } => match action {
            ColumnAction::Add { board, name, id } => {
                let mut op = AddColumn::new(board, name);
                op.id = id.map(Into::into);
                processor.process(&op, ctx).await
            }
            ColumnAction::Update { id, name } => {
                processor.process(&UpdateColumn::new(id, name), ctx).await
            }
            ColumnAction::Move { id, before, after } => {
                let mut op = MoveColumn::new(id);
                op.before = before.map(Into::into);
                op.after = after.map(Into::into);
                processor.process(&op, ctx).await
            }
            ColumnAction::Delete { id } => processor.process(&DeleteColumn::new(id), ctx).await,
        },

        Commands::Card { action } => match action {
            CardAction::Add {
                column,
                title,
                content,
                id,
            } => {
                let mut op = AddCard::new(column, title);
                op.content = content;
                op.id = id.map(Into::into);
                processor.process(&op, ctx).await
            }
            CardAction::Update { id, title, content } => {
                let mut op = UpdateCard::new(id);
                op.title = title;
                op.content = content;
                processor.process(&op, ctx).await
            }
            CardAction::Move {
                id,
                column,
                before,
                after,
            } => {
                let mut op = MoveCard::new(id, column);
                op.before = before.map(Into::into);
                op.after = after.map(Into::into);
                processor.process(&op, ctx).await
            }
            CardAction::Delete { id } => processor.process(&DeleteCard::new(id), ctx).await,
        },

        Commands::Ops => Ok(operations()),
    }
}

/// Every operation with its parameter metadata
pub fn operations() -> Value {
    let ops: Vec<Box<dyn Operation>> = vec![
        Box::new(CreateBoard::new("", "")),
        Box::new(ListBoards::new()),
        Box::new(GetBoard::new("")),
        Box::new(UpdateBoard::new("")),
        Box::new(DeleteBoard::new("")),
        Box::new(AddColumn::new("", "")),
        Box::new(UpdateColumn::new("", "")),
        Box::new(MoveColumn::new("")),
        Box::new(DeleteColumn::new("")),
        Box::new(AddCard::new("", "")),
        Box::new(UpdateCard::new("")),
        Box::new(MoveCard::new("", "")),
        Box::new(DeleteCard::new("")),
    ];

    let ops: Vec<Value> = ops
        .iter()
        .map(|op| {
            let parameters: Vec<Value> = op
                .parameters()
                .iter()
                .map(|p| {
                    json!({
                        "name": p.name,
                        "type": p.param_type.as_str(),
                        "required": p.required,
                        "short": p.short.map(String::from),
                        "description": p.description,
                    })
                })
                .collect();
            json!({
                "op": op.op_string(),
                "description": op.description(),
                "parameters": parameters,
            })
        })
        .collect();

    json!({ "operations": ops, "count": ops.len() })
}
