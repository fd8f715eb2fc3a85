/*!
 * Identity extractors
 *
 * Responsibility:
 * - bearer middleware が extensions に入れた SecurityContext から Identity を取り出す
 * - 認証必須 / 任意 の 2 種類
 */

mod core;

pub use self::core::{CurrentIdentity, MaybeIdentity};
