use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 部分更新DTOにおけるNULL許容フィールドの三状態表現
///
/// JSON上の「フィールド省略」と「明示的なnull」を区別する。
/// - 省略: 既存値を保持する（Absent）
/// - null: カラムにNULLを設定する（Null）
/// - 値あり: カラムにその値を設定する（Value）
///
/// 使用する際はフィールドに
/// `#[serde(default, skip_serializing_if = "Patch::is_absent")]` を付与すること。
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Patch<T> {
    /// フィールドが省略された（既存値を保持する）
    #[default]
    Absent,
    /// 明示的にnullが指定された（NULLを設定する）
    Null,
    /// 値が指定された
    Value(T),
}

impl<T> Patch<T> {
    /// フィールドが省略されたかどうかを返す
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// 更新で設定すべき値を返す
    ///
    /// # 戻り値
    /// 省略時はNone、NULL設定はSome(None)、値設定はSome(Some(値))
    pub fn into_update_value(self) -> Option<Option<T>> {
        match self {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(value) => Some(Some(value)),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // フィールドが存在する場合のみ呼ばれる（省略時はserde(default)でAbsentになる）
        Option::<T>::deserialize(deserializer).map(|value| match value {
            None => Patch::Null,
            Some(value) => Patch::Value(value),
        })
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Absent | Patch::Null => serializer.serialize_none(),
            Patch::Value(value) => serializer.serialize_some(value),
        }
    }
}
